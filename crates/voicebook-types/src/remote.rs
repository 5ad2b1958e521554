//! Response bodies returned by the remote booking service.
//!
//! Field names follow the service's snake_case JSON. Unknown fields are
//! ignored; no validation happens beyond what serde requires.

use serde::{Deserialize, Serialize};

use crate::{Alternative, Message};

/// Body of `GET {api}welcome-doctor`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Greeting {
    pub message: String,
    pub result_audio_path: String,
}

impl Greeting {
    /// Converts the greeting into the assistant's opening message.
    pub fn into_message(self) -> Message {
        Message::from_rachel(self.message, self.result_audio_path)
    }
}

/// The booking outcome nested inside a [`BookingReply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingResult {
    pub message: String,
    pub result_audio_path: String,
    /// Offered slots when the requested one is unavailable. The service
    /// omits the field (or sends `null`) when there is nothing to offer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternatives: Option<Vec<Alternative>>,
}

/// Body of `POST {api}voice-chat/book-appointment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingReply {
    pub transcription: String,
    pub booking_result: BookingResult,
}

impl BookingReply {
    /// Splits the reply into the user's transcript and the assistant's
    /// answer, in conversation order.
    pub fn into_messages(self) -> [Message; 2] {
        let result = self.booking_result;
        let me = Message::from_me(self.transcription);
        let rachel = Message::from_rachel(result.message, result.result_audio_path)
            .with_alternatives(result.alternatives.unwrap_or_default());
        [me, rachel]
    }
}
