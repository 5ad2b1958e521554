//! Mediates between user actions, the booking service, and the conversation.
//!
//! Every operation follows the same shape: check-and-set the new state under
//! the write lock, release the lock, await the remote call, then re-take the
//! lock to append the outcome and settle the state. The lock is never held
//! across an `.await`, and because entering `Awaiting` is checked under the
//! lock, at most one remote call is outstanding at a time.

use crate::audio::AudioClip;
use crate::error::SessionError;
use crate::event::SessionEvent;
use crate::state::{Operation, SessionState};
use crate::store::Conversation;
use serde::Serialize;
use std::sync::{RwLock, RwLockWriteGuard};
use tokio::sync::broadcast;
use tracing::{error, info};
use voicebook_client::BookingApi;
use voicebook_types::Message;

/// Default capacity for the session event broadcast channel.
const DEFAULT_EVENT_BROADCAST_CAPACITY: usize = 64;

#[derive(Debug, Default)]
struct Inner {
    state: SessionState,
    conversation: Conversation,
}

/// A consistent copy of the session for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub messages: Vec<Message>,
}

impl SessionSnapshot {
    pub fn awaiting_response(&self) -> bool {
        self.state.awaiting_response()
    }

    pub fn recording_active(&self) -> bool {
        self.state.recording_active()
    }
}

/// Owns the conversation and the session state; the only component that
/// talks to the booking service.
#[derive(Debug)]
pub struct SessionController<A: BookingApi> {
    api: A,
    inner: RwLock<Inner>,
    events_tx: broadcast::Sender<SessionEvent>,
}

impl<A: BookingApi> SessionController<A> {
    pub fn new(api: A) -> Self {
        let (events_tx, _) = broadcast::channel(DEFAULT_EVENT_BROADCAST_CAPACITY);
        Self {
            api,
            inner: RwLock::new(Inner::default()),
            events_tx,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Subscribes to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events_tx.subscribe()
    }

    pub fn state(&self) -> Result<SessionState, SessionError> {
        let inner = self.inner.read().map_err(|_| SessionError::LockPoisoned)?;
        Ok(inner.state)
    }

    pub fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        let inner = self.inner.read().map_err(|_| SessionError::LockPoisoned)?;
        Ok(SessionSnapshot {
            state: inner.state,
            messages: inner.conversation.messages().to_vec(),
        })
    }

    /// Starts the session and fetches the assistant's greeting.
    ///
    /// On success one `rachel` message is appended. On failure the store is
    /// left untouched; the error is logged, broadcast as
    /// [`SessionEvent::RequestFailed`], and returned.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidTransition`] unless the session is `Idle`;
    /// [`SessionError::Remote`] if the greeting call fails.
    pub async fn start_session(&self) -> Result<(), SessionError> {
        self.begin(Operation::StartSession)?;

        match self.api.greet().await {
            Ok(greeting) => {
                let mut message = greeting.into_message();
                self.resolve_audio(&mut message);
                self.complete(vec![message])
            }
            Err(e) => self.fail(Operation::StartSession, e.into()),
        }
    }

    /// Uploads a finished recording for booking.
    ///
    /// On success two messages are appended in order: the user's transcript,
    /// then the assistant's reply with any offered alternatives. On failure
    /// nothing is appended.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidTransition`] unless the session is `Listening`;
    /// [`SessionError::Audio`] if the recording cannot be read;
    /// [`SessionError::Remote`] if the booking call fails.
    pub async fn submit_recording(&self, audio: AudioClip) -> Result<(), SessionError> {
        self.begin(Operation::SubmitRecording)?;

        let bytes = match audio.into_bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return self.fail(Operation::SubmitRecording, e.into()),
        };

        match self.api.book_appointment(bytes).await {
            Ok(reply) => {
                let [me, mut rachel] = reply.into_messages();
                self.resolve_audio(&mut rachel);
                self.complete(vec![me, rachel])
            }
            Err(e) => self.fail(Operation::SubmitRecording, e.into()),
        }
    }

    /// Clears the conversation. The session state is left as is.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidTransition`] while a call is outstanding.
    pub fn reset(&self) -> Result<(), SessionError> {
        let mut inner = self.lock()?;
        inner.state.begin(Operation::Reset)?;
        inner.conversation.clear();
        drop(inner);

        info!("conversation cleared");
        self.emit(SessionEvent::Cleared);
        Ok(())
    }

    fn lock(&self) -> Result<RwLockWriteGuard<'_, Inner>, SessionError> {
        self.inner.write().map_err(|_| SessionError::LockPoisoned)
    }

    fn begin(&self, op: Operation) -> Result<(), SessionError> {
        let mut inner = self.lock()?;
        let next = inner.state.begin(op)?;
        inner.state = next;
        drop(inner);

        info!(operation = %op, state = %next, "session request started");
        self.emit(SessionEvent::StateChanged { state: next });
        Ok(())
    }

    fn complete(&self, messages: Vec<Message>) -> Result<(), SessionError> {
        let mut inner = self.lock()?;
        let mut appended = Vec::with_capacity(messages.len());
        for message in messages {
            let index = inner.conversation.push(message.clone());
            appended.push(SessionEvent::MessageAppended { index, message });
        }
        inner.state = inner.state.complete();
        let state = inner.state;
        let total = inner.conversation.len();
        drop(inner);

        info!(appended = appended.len(), total, "session request completed");
        for event in appended {
            self.emit(event);
        }
        self.emit(SessionEvent::StateChanged { state });
        Ok(())
    }

    fn fail(&self, op: Operation, err: SessionError) -> Result<(), SessionError> {
        error!(operation = %op, error = %err, "session request failed");

        let mut inner = self.lock()?;
        inner.state = inner.state.complete();
        let state = inner.state;
        drop(inner);

        self.emit(SessionEvent::RequestFailed {
            operation: op,
            error: err.to_string(),
        });
        self.emit(SessionEvent::StateChanged { state });
        Err(err)
    }

    fn resolve_audio(&self, message: &mut Message) {
        if let Some(path) = message.audio_url.take() {
            message.audio_url = Some(self.api.resolve_audio_url(&path));
        }
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is normal; the event is simply dropped.
        let _ = self.events_tx.send(event);
    }
}
