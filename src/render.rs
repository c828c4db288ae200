//! Message presentation: status line, transient user messages, and the
//! character-by-character assistant reveal.
//!
//! Timed behavior runs on tracked tokio tasks. Starting a new reveal or a
//! new user-message hide timer aborts the previous one, so stale timers can
//! never fire over newer content.

use crate::events::{EventSink, ViewState, WidgetEvent};
use crate::settings::Settings;
use crate::speech::SpeechOutput;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Resting status line.
pub const STATUS_IDLE: &str = "Waiting for your command...";
/// Status line while a recognition session is in flight.
pub const STATUS_LISTENING: &str = "Listening...";
/// Status line after a failed dispatch; clicking the orb retries listening.
pub const STATUS_RETRY: &str = "Error - click to retry";

/// Delay between revealed characters.
const REVEAL_DELAY: Duration = Duration::from_millis(25);
/// How long a user message stays visible.
const USER_MESSAGE_TTL: Duration = Duration::from_secs(3);
/// Cursor glyph trailing the reveal.
const REVEAL_CURSOR: char = '|';

/// Shared single-line status text, mirrored to the event stream.
///
/// Cloned into every component that reports status so all of them observe
/// and update the same line.
#[derive(Clone)]
pub struct StatusLine {
    current: Arc<Mutex<String>>,
    events: EventSink,
}

impl StatusLine {
    /// Create a status line resting at [`STATUS_IDLE`].
    #[must_use]
    pub fn new(events: EventSink) -> Self {
        Self {
            current: Arc::new(Mutex::new(STATUS_IDLE.to_string())),
            events,
        }
    }

    /// Replace the status text and emit it.
    pub fn set(&self, text: impl Into<String>) {
        let text = text.into();
        {
            let mut current = self
                .current
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            *current = text.clone();
        }
        self.events.emit(WidgetEvent::Status(text));
    }

    /// Current status text.
    #[must_use]
    pub fn current(&self) -> String {
        self.current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Revert to [`STATUS_IDLE`], but only if the line still shows `expected`.
    ///
    /// Lets a timed revert stand down when something else already changed
    /// the status underneath it.
    pub fn restore_idle_if(&self, expected: &str) {
        if self.current() == expected {
            self.set(STATUS_IDLE);
        }
    }
}

/// Drives message presentation through the event stream.
pub struct Renderer {
    events: EventSink,
    speech: SpeechOutput,
    settings: Settings,
    hide_task: Option<JoinHandle<()>>,
    reveal_task: Option<JoinHandle<()>>,
    reveal_delay: Duration,
    user_message_ttl: Duration,
}

impl Renderer {
    pub fn new(events: EventSink, speech: SpeechOutput, settings: Settings) -> Self {
        Self {
            events,
            speech,
            settings,
            hide_task: None,
            reveal_task: None,
            reveal_delay: REVEAL_DELAY,
            user_message_ttl: USER_MESSAGE_TTL,
        }
    }

    /// Override the reveal cadence (tests).
    #[must_use]
    pub fn with_reveal_delay(mut self, delay: Duration) -> Self {
        self.reveal_delay = delay;
        self
    }

    /// Override how long user messages stay visible (tests).
    #[must_use]
    pub fn with_user_message_ttl(mut self, ttl: Duration) -> Self {
        self.user_message_ttl = ttl;
        self
    }

    /// Take a fresh settings snapshot for subsequent messages.
    pub fn apply_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    /// Show the user's own message, hidden again after a short delay.
    ///
    /// A newer message restarts the hide timer; the old timer is aborted so
    /// it cannot hide the new message early.
    pub fn show_user_message(&mut self, text: &str) {
        let timestamp = self.settings.show_timestamp.then(chrono::Local::now);
        self.events.emit(WidgetEvent::UserMessage {
            text: text.to_string(),
            timestamp,
        });

        if let Some(task) = self.hide_task.take() {
            task.abort();
        }
        let events = self.events.clone();
        let ttl = self.user_message_ttl;
        self.hide_task = Some(tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            events.emit(WidgetEvent::UserMessageHidden);
        }));
    }

    /// Reveal an assistant reply character by character, speaking it as the
    /// reveal starts.
    ///
    /// Switches to the conversation view and shows the new-question
    /// affordance. A reply arriving mid-reveal aborts the old reveal task
    /// before starting its own.
    pub fn show_assistant_message(&mut self, text: &str) {
        self.events.emit(WidgetEvent::View(ViewState::Conversation));
        self.events.emit(WidgetEvent::NewQuestionVisible(true));
        self.speech.speak(text, &self.settings);

        if let Some(task) = self.reveal_task.take() {
            task.abort();
        }
        self.events.emit(WidgetEvent::RevealStarted {
            cursor: REVEAL_CURSOR,
        });

        let events = self.events.clone();
        let delay = self.reveal_delay;
        let chars: Vec<char> = text.chars().collect();
        self.reveal_task = Some(tokio::spawn(async move {
            for c in chars {
                events.emit(WidgetEvent::RevealChar(c));
                tokio::time::sleep(delay).await;
            }
            events.emit(WidgetEvent::RevealFinished);
        }));
    }

    /// Return to the welcome view.
    ///
    /// Cancels speech and clears transient content; an in-flight reveal is
    /// left running so its text is complete if the view comes back.
    pub fn reset(&mut self) {
        self.speech.cancel();
        if let Some(task) = self.hide_task.take() {
            task.abort();
        }
        self.events.emit(WidgetEvent::View(ViewState::Welcome));
        self.events.emit(WidgetEvent::UserMessageHidden);
        self.events.emit(WidgetEvent::NewQuestionVisible(false));
    }
}
