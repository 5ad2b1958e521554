//! Session state machine.

use crate::error::SessionError;
use serde::{Deserialize, Serialize};

/// Where the session is in its request lifecycle.
///
/// | From | Operation | In flight | Completed |
/// |------|-----------|-----------|-----------|
/// | `Idle` | start | `Awaiting` | `Listening` |
/// | `Listening` | submit | `Awaiting` | `Listening` |
/// | `Idle` / `Listening` | reset | unchanged | unchanged |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Nothing started yet; the start control is shown.
    #[default]
    Idle,
    /// Session started; the recording widget is shown.
    Listening,
    /// A remote call is outstanding.
    Awaiting,
}

/// Operations that move the session between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    StartSession,
    SubmitRecording,
    Reset,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StartSession => "start_session",
            Self::SubmitRecording => "submit_recording",
            Self::Reset => "reset",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SessionState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Listening => "listening",
            Self::Awaiting => "awaiting",
        }
    }

    /// True while a remote call is outstanding.
    pub fn awaiting_response(self) -> bool {
        self == Self::Awaiting
    }

    /// True once the user has started the session.
    pub fn recording_active(self) -> bool {
        self != Self::Idle
    }

    /// Returns the state entered when `op` begins from `self`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidTransition`] when `op` is not allowed
    /// from the current state.
    pub fn begin(self, op: Operation) -> Result<Self, SessionError> {
        match (self, op) {
            (Self::Idle, Operation::StartSession) => Ok(Self::Awaiting),
            (Self::Listening, Operation::SubmitRecording) => Ok(Self::Awaiting),
            (Self::Idle | Self::Listening, Operation::Reset) => Ok(self),
            (state, operation) => Err(SessionError::InvalidTransition { operation, state }),
        }
    }

    /// Returns the state entered when the outstanding call finishes,
    /// whether it succeeded or failed.
    pub fn complete(self) -> Self {
        match self {
            Self::Awaiting => Self::Listening,
            other => other,
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
