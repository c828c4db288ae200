//! The widget's named-intent surface and view-event stream.
//!
//! The presentation layer feeds [`UiIntent`] values into the controller and
//! consumes [`WidgetEvent`] values from the channel returned by
//! [`event_channel`]. The core never touches a real UI: everything a frontend
//! needs to draw (status line, view state, reveal steps, style data) arrives
//! as events.

use crate::gate::PendingAction;
use crate::settings::Settings;
use chrono::{DateTime, Local};
use tokio::sync::mpsc;

/// Named user intents a presentation layer binds to its input events.
#[derive(Debug, Clone)]
pub enum UiIntent {
    /// Start or stop voice recognition (mic button).
    ToggleListening,
    /// Submit a typed command (text field + send button / Enter).
    SubmitText(String),
    /// Return to the welcome view and re-arm listening.
    NewQuestion,
    /// Direct user activation of the offered pending action.
    ActivatePendingAction,
    /// Persist and apply new settings from the settings form.
    SaveSettings(Settings),
    /// Restore and persist the compiled-in default settings.
    ResetSettings,
}

/// Which of the two mutually exclusive top-level views is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// Idle orb animation, control bar, no response panels.
    Welcome,
    /// Response card visible, idle controls hidden.
    Conversation,
}

/// View events emitted by the core for the presentation layer.
#[derive(Debug, Clone)]
pub enum WidgetEvent {
    /// The status line text changed.
    Status(String),
    /// Voice recognition started or stopped.
    Listening(bool),
    /// Whether a recognition engine is available (mic control enabled).
    MicAvailable(bool),
    /// The active view changed.
    View(ViewState),
    /// A transient user message should be shown.
    UserMessage {
        text: String,
        /// Present when the show-timestamp setting is enabled.
        timestamp: Option<DateTime<Local>>,
    },
    /// The transient user message timed out.
    UserMessageHidden,
    /// An assistant reveal is starting; prior content is cleared and the
    /// trailing cursor glyph should be shown until [`WidgetEvent::RevealFinished`].
    RevealStarted { cursor: char },
    /// The next character of the assistant reply, in order.
    RevealChar(char),
    /// The reveal completed; remove the trailing cursor.
    RevealFinished,
    /// Show or hide the "ask a new question" affordance.
    NewQuestionVisible(bool),
    /// A navigation is being gated behind a user click.
    PendingActionOffered(PendingAction),
    /// The gated navigation was consumed or discarded.
    PendingActionCleared,
    /// Replace the generated animation style block (at most one exists).
    StyleBlock(String),
    /// The theme accent color changed.
    Theme { hex: &'static str },
    /// Toggle the glow filter on the known visual targets.
    Glow { enabled: bool },
    /// A non-fatal condition the user should see (e.g. blocked pop-up).
    Warning(String),
}

/// Sending half of the widget event channel.
///
/// Emission is best-effort: events sent after the receiver is dropped are
/// discarded silently, so background tasks never fail on shutdown.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<WidgetEvent>,
}

impl EventSink {
    /// Emit an event to the presentation layer.
    pub fn emit(&self, event: WidgetEvent) {
        let _ = self.tx.send(event);
    }
}

/// Create the widget event channel.
pub fn event_channel() -> (EventSink, mpsc::UnboundedReceiver<WidgetEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSink { tx }, rx)
}
