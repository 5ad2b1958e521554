//! Error types for the session layer.

use crate::state::{Operation, SessionState};
use voicebook_client::ClientError;

/// Errors returned by [`crate::SessionController`] operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The operation is not allowed in the current state.
    #[error("cannot {operation} while session is {state}")]
    InvalidTransition {
        operation: Operation,
        state: SessionState,
    },

    /// The recorded audio could not be read.
    #[error("failed to read recording: {0}")]
    Audio(#[from] std::io::Error),

    /// The remote booking service call failed.
    #[error("remote call failed: {0}")]
    Remote(#[from] ClientError),

    /// A panic while holding the session lock left it poisoned.
    #[error("session lock poisoned")]
    LockPoisoned,
}
