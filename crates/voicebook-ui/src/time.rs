//! 24-hour to 12-hour clock conversion for appointment slots.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeFormatError {
    #[error("not an HH:MM time: {0:?}")]
    Malformed(String),
    #[error("time out of range: {0:?}")]
    OutOfRange(String),
}

/// Converts `"HH:MM"` (24-hour) to `"H:MM AM"` / `"H:MM PM"`.
///
/// Midnight is `12:MM AM` and noon is `12:MM PM`. Minutes are zero-padded.
/// A trailing `:SS` component is ignored.
pub fn format_12h(time24: &str) -> Result<String, TimeFormatError> {
    let malformed = || TimeFormatError::Malformed(time24.to_string());

    let mut parts = time24.trim().split(':');
    let hours: u32 = parts
        .next()
        .and_then(|h| h.parse().ok())
        .ok_or_else(malformed)?;
    let minutes: u32 = parts
        .next()
        .and_then(|m| m.parse().ok())
        .ok_or_else(malformed)?;

    if hours > 23 || minutes > 59 {
        return Err(TimeFormatError::OutOfRange(time24.to_string()));
    }

    let suffix = if hours >= 12 { "PM" } else { "AM" };
    let display_hours = match hours % 12 {
        0 => 12,
        h => h,
    };

    Ok(format!("{display_hours}:{minutes:02} {suffix}"))
}

/// Formats a slot for display, showing unparseable input unchanged.
pub fn display_time(time24: &str) -> String {
    format_12h(time24).unwrap_or_else(|_| time24.to_string())
}
