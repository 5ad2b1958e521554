//! Conversation state and request lifecycle for Voicebook.
//!
//! [`SessionController`] owns the conversation log and the session state and
//! is the only component that calls the booking service. It starts a
//! session by fetching the assistant's greeting, uploads recordings for
//! booking, and appends what comes back. Everything observable about a
//! session is exposed two ways: [`SessionController::snapshot`] for
//! rendering, and a broadcast of [`SessionEvent`]s for anything that wants
//! to react as it happens.
//!
//! # Failure policy
//!
//! A failed remote call never appends anything. The controller logs it,
//! broadcasts [`SessionEvent::RequestFailed`], returns the session to
//! `Listening`, and hands the error back to the caller. There is no retry.

mod audio;
mod controller;
mod error;
mod event;
mod state;
mod store;

pub use audio::AudioClip;
pub use controller::{SessionController, SessionSnapshot};
pub use error::SessionError;
pub use event::SessionEvent;
pub use state::{Operation, SessionState};
pub use store::Conversation;
