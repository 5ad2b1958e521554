//! Client for the remote appointment-booking service.
//!
//! The service does all of the heavy lifting: speech recognition, intent
//! parsing, the booking itself, and speech synthesis for the reply. This
//! crate only knows its two endpoints:
//!
//! - `GET {api}welcome-doctor` returns the assistant's greeting.
//! - `POST {api}voice-chat/book-appointment` takes a multipart audio upload
//!   and returns the transcript plus the booking outcome.
//!
//! Callers depend on the [`BookingApi`] trait so the session layer can be
//! exercised without a network.

pub mod client;
pub mod config;
pub mod error;

pub use client::{BookingApi, HttpBookingClient};
pub use config::ServiceConfig;
pub use error::ClientError;
