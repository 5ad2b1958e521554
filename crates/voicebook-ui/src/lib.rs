//! Presentation layer for Voicebook.
//!
//! Rendering is a pure function of a [`voicebook_session::SessionSnapshot`]:
//! [`View::from_snapshot`] decides what to show and [`render_page`] turns it
//! into an HTML document. Appointment slots arrive as 24-hour `HH:MM`
//! strings and are shown on a 12-hour clock via [`format_12h`].

pub mod html;
pub mod time;
pub mod view;

pub use html::{escape_html, render_page};
pub use time::{display_time, format_12h, TimeFormatError};
pub use view::{AvailabilityRow, Bubble, Control, Placeholder, View};
