//! Events broadcast by the session controller.

use crate::state::{Operation, SessionState};
use serde::{Deserialize, Serialize};
use voicebook_types::Message;

/// Something observable happened to the session.
///
/// Subscribers use these to re-render or to surface failures that the
/// controller otherwise only logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    StateChanged {
        state: SessionState,
    },
    MessageAppended {
        index: usize,
        message: Message,
    },
    Cleared,
    /// A remote call (or reading the recording) failed. Nothing was appended.
    RequestFailed {
        operation: Operation,
        error: String,
    },
}
