//! Voice recognition input adapter.
//!
//! The widget owns the listening state machine; the actual recognizer is
//! injected behind [`RecognitionEngine`]. The engine reports back through
//! [`RecognitionEvent`] values which the controller feeds into
//! [`SpeechInput::handle_event`].

use crate::error::{Result, WidgetError};
use crate::events::{EventSink, WidgetEvent};
use crate::render::{StatusLine, STATUS_IDLE, STATUS_LISTENING};

/// Status line shown when recognition ends without hearing anything.
pub const STATUS_NO_SPEECH: &str = "No speech detected";
/// Status line shown when the user denied microphone access.
pub const STATUS_MIC_DENIED: &str = "Microphone access denied";
/// Status line shown for other recognition failures.
pub const STATUS_RECOGNITION_ERROR: &str = "Error - please try again";
/// Status line shown when no recognition engine exists at all.
pub const STATUS_UNAVAILABLE: &str = "Speech recognition not available";

/// Events a recognition engine reports back to the widget.
#[derive(Debug, Clone)]
pub enum RecognitionEvent {
    /// A final transcript was produced.
    Result { transcript: String },
    /// Recognition failed.
    Error(RecognitionErrorKind),
    /// The recognition session ended (always fires, after result or error).
    Ended,
}

/// Why a recognition session failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionErrorKind {
    /// The session timed out without detecting speech.
    NoSpeech,
    /// Microphone permission was denied.
    NotAllowed,
    /// Anything else, with the engine's own description.
    Other(String),
}

/// A single-utterance speech recognizer.
///
/// `start` begins one non-continuous session producing at most one final
/// transcript; `stop` aborts an in-flight session early (the engine still
/// reports [`RecognitionEvent::Ended`]).
pub trait RecognitionEngine: Send {
    fn start(&mut self) -> Result<()>;
    fn stop(&mut self);
}

/// Listening state of the voice input side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenState {
    /// No recognition engine was supplied; voice input is disabled.
    Unavailable,
    /// Ready to listen.
    Idle,
    /// A recognition session is in flight.
    Listening,
}

/// Voice input adapter around an injected [`RecognitionEngine`].
pub struct SpeechInput {
    engine: Option<Box<dyn RecognitionEngine>>,
    state: ListenState,
    status: StatusLine,
    events: EventSink,
}

impl SpeechInput {
    /// Create the adapter. Passing `None` yields a permanently unavailable
    /// input side (text entry still works).
    pub fn new(
        engine: Option<Box<dyn RecognitionEngine>>,
        status: StatusLine,
        events: EventSink,
    ) -> Self {
        let state = if engine.is_some() {
            ListenState::Idle
        } else {
            ListenState::Unavailable
        };
        Self {
            engine,
            state,
            status,
            events,
        }
    }

    /// Whether a recognition engine exists.
    #[must_use]
    pub fn available(&self) -> bool {
        self.engine.is_some()
    }

    /// Current listening state.
    #[must_use]
    pub fn state(&self) -> ListenState {
        self.state
    }

    /// Start a recognition session if not already listening.
    pub fn start_listening(&mut self) -> Result<()> {
        match self.state {
            ListenState::Unavailable => {
                self.status.set(STATUS_UNAVAILABLE);
                Err(WidgetError::Speech("no recognition engine".into()))
            }
            ListenState::Listening => Ok(()),
            ListenState::Idle => {
                let engine = self
                    .engine
                    .as_mut()
                    .ok_or_else(|| WidgetError::Speech("no recognition engine".into()))?;
                engine.start()?;
                self.state = ListenState::Listening;
                self.status.set(STATUS_LISTENING);
                self.events.emit(WidgetEvent::Listening(true));
                tracing::debug!("recognition started");
                Ok(())
            }
        }
    }

    /// Stop an in-flight session.
    pub fn stop_listening(&mut self) {
        if self.state != ListenState::Listening {
            return;
        }
        if let Some(engine) = self.engine.as_mut() {
            engine.stop();
        }
        self.state = ListenState::Idle;
        self.events.emit(WidgetEvent::Listening(false));
    }

    /// Toggle between listening and idle (the mic button behavior).
    pub fn toggle(&mut self) -> Result<()> {
        match self.state {
            ListenState::Listening => {
                self.stop_listening();
                self.status.set(STATUS_IDLE);
                Ok(())
            }
            _ => self.start_listening(),
        }
    }

    /// Process an engine event. Returns a transcript when one was produced;
    /// the caller dispatches it like typed text.
    pub fn handle_event(&mut self, event: RecognitionEvent) -> Option<String> {
        match event {
            RecognitionEvent::Result { transcript } => {
                tracing::debug!(%transcript, "recognition result");
                Some(transcript)
            }
            RecognitionEvent::Error(kind) => {
                let status = match &kind {
                    RecognitionErrorKind::NoSpeech => STATUS_NO_SPEECH,
                    RecognitionErrorKind::NotAllowed => STATUS_MIC_DENIED,
                    RecognitionErrorKind::Other(detail) => {
                        tracing::warn!(%detail, "recognition error");
                        STATUS_RECOGNITION_ERROR
                    }
                };
                self.status.set(status);
                None
            }
            RecognitionEvent::Ended => {
                if self.state == ListenState::Listening {
                    self.state = ListenState::Idle;
                    self.events.emit(WidgetEvent::Listening(false));
                }
                // Error statuses set before Ended stay visible; only the
                // plain listening indicator reverts to idle.
                self.status.restore_idle_if(STATUS_LISTENING);
                None
            }
        }
    }
}
