//! View model derived from a session snapshot.
//!
//! Everything the page shows is decided here, so the placeholder and
//! control rules can be checked without parsing markup.

use crate::time::display_time;
use voicebook_session::{SessionSnapshot, SessionState};
use voicebook_types::{Alternative, Message, Sender};

/// Prompt shown instead of (or below) the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// Nothing said yet and nothing pending.
    Empty,
    /// A reply is on its way.
    Waiting,
}

impl Placeholder {
    pub fn text(self) -> &'static str {
        match self {
            Self::Empty => "Talk to Rachel to book an appointment...",
            Self::Waiting => "Gimme a few seconds...",
        }
    }
}

/// The single user affordance at the bottom of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    StartButton,
    Recorder,
}

/// One day of offered slots, times already formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityRow {
    pub day: String,
    pub times: String,
}

impl From<&Alternative> for AvailabilityRow {
    fn from(alt: &Alternative) -> Self {
        let times = alt
            .times
            .iter()
            .map(|t| display_time(t))
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            day: alt.day.clone(),
            times,
        }
    }
}

/// A rendered message bubble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bubble {
    pub sender: Sender,
    pub text: Option<String>,
    pub audio_url: Option<String>,
    pub availability: Vec<AvailabilityRow>,
}

impl From<&Message> for Bubble {
    fn from(msg: &Message) -> Self {
        Self {
            sender: msg.sender,
            text: msg.text.clone(),
            audio_url: msg.audio_url.clone(),
            availability: msg.alternatives.iter().map(AvailabilityRow::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    /// Session state the view was built from.
    pub state: SessionState,
    pub bubbles: Vec<Bubble>,
    pub placeholder: Option<Placeholder>,
    pub control: Control,
}

impl View {
    pub fn from_snapshot(snapshot: &SessionSnapshot) -> Self {
        let placeholder = if snapshot.awaiting_response() {
            Some(Placeholder::Waiting)
        } else if snapshot.messages.is_empty() {
            Some(Placeholder::Empty)
        } else {
            None
        };

        let control = if snapshot.recording_active() {
            Control::Recorder
        } else {
            Control::StartButton
        };

        Self {
            state: snapshot.state,
            bubbles: snapshot.messages.iter().map(Bubble::from).collect(),
            placeholder,
            control,
        }
    }

    pub fn is_waiting(&self) -> bool {
        self.placeholder == Some(Placeholder::Waiting)
    }
}
