//! Shared types for the Voicebook workspace.
//!
//! This crate holds the conversation data model rendered by the front end
//! and the response bodies returned by the remote booking service. Every
//! other crate in the workspace depends on it for these definitions, so it
//! carries no logic beyond small constructors and accessors.

use serde::{Deserialize, Serialize};

mod remote;
pub use remote::{BookingReply, BookingResult, Greeting};

/// Who authored a message in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The person speaking into the microphone.
    Me,
    /// The booking assistant.
    Rachel,
}

impl Sender {
    /// Returns the display label for this sender.
    pub fn label(self) -> &'static str {
        match self {
            Self::Me => "me",
            Self::Rachel => "rachel",
        }
    }
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One offered appointment day and the free slots on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alternative {
    /// Day label as sent by the service (e.g. "Monday" or "2024-05-02").
    pub day: String,
    /// Slot start times in 24-hour `HH:MM` form.
    #[serde(default)]
    pub times: Vec<String>,
}

/// One turn of the conversation.
///
/// Messages are immutable once appended to a conversation; all fields other
/// than `sender` are optional and rendered only when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub alternatives: Vec<Alternative>,
}

impl Message {
    /// A transcript of what the user said.
    pub fn from_me(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Me,
            text: Some(text.into()),
            audio_url: None,
            alternatives: Vec::new(),
        }
    }

    /// A spoken reply from the assistant.
    pub fn from_rachel(text: impl Into<String>, audio_url: impl Into<String>) -> Self {
        Self {
            sender: Sender::Rachel,
            text: Some(text.into()),
            audio_url: Some(audio_url.into()),
            alternatives: Vec::new(),
        }
    }

    /// Attaches offered appointment alternatives.
    pub fn with_alternatives(mut self, alternatives: Vec<Alternative>) -> Self {
        self.alternatives = alternatives;
        self
    }

    /// True when the message offers at least one alternative day.
    pub fn has_alternatives(&self) -> bool {
        !self.alternatives.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Sender::Me).unwrap(), "\"me\"");
        assert_eq!(
            serde_json::to_string(&Sender::Rachel).unwrap(),
            "\"rachel\""
        );
        let parsed: Sender = serde_json::from_str("\"rachel\"").unwrap();
        assert_eq!(parsed, Sender::Rachel);
    }

    #[test]
    fn sender_labels() {
        assert_eq!(Sender::Me.label(), "me");
        assert_eq!(Sender::Rachel.to_string(), "rachel");
    }

    #[test]
    fn transcript_message_has_no_audio() {
        let msg = Message::from_me("book me tomorrow");
        assert_eq!(msg.sender, Sender::Me);
        assert_eq!(msg.text.as_deref(), Some("book me tomorrow"));
        assert!(msg.audio_url.is_none());
        assert!(!msg.has_alternatives());
    }

    #[test]
    fn optional_fields_are_omitted_when_absent() {
        let msg = Message::from_me("hi");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["sender"], "me");
        assert!(json.get("audio_url").is_none());
        assert_eq!(json["alternatives"], serde_json::json!([]));
    }

    #[test]
    fn alternatives_attach_in_order() {
        let msg = Message::from_rachel("Tuesday is full", "b.mp3").with_alternatives(vec![
            Alternative {
                day: "Wednesday".to_string(),
                times: vec!["09:00".to_string(), "14:30".to_string()],
            },
            Alternative {
                day: "Thursday".to_string(),
                times: vec!["11:00".to_string()],
            },
        ]);
        assert!(msg.has_alternatives());
        assert_eq!(msg.alternatives[0].day, "Wednesday");
        assert_eq!(msg.alternatives[1].times, vec!["11:00"]);
    }
}
