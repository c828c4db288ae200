//! Click-gated navigation.
//!
//! Browsers only allow pop-ups (and media autoplay) inside a direct user
//! gesture, so a reply that wants to open a URL is never opened directly:
//! the URL is held as a [`PendingAction`] and offered to the user as a
//! button. Activation happens in the user's click handler, where the open
//! is allowed.

use crate::events::{EventSink, WidgetEvent};
use std::sync::Arc;

/// Warning shown when activating a pending action failed to open a window.
pub const POPUP_BLOCKED_WARNING: &str =
    "Pop-up blocked! Please allow pop-ups for this site and try again.";

/// Opens a URL in a new browser window/tab.
///
/// Returns whether a window was actually opened; `false` usually means a
/// pop-up blocker intervened.
pub trait UrlOpener: Send + Sync {
    fn open(&self, url: &str) -> bool;
}

/// Opener backed by the operating system's default browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

impl UrlOpener for SystemOpener {
    fn open(&self, url: &str) -> bool {
        match open::that(url) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(%url, error = %e, "failed to open url");
                false
            }
        }
    }
}

/// A navigation held until the user clicks the offered button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAction {
    /// URL to open on activation.
    pub url: String,
    /// Whether the URL points straight at playable media.
    pub is_direct_video: bool,
    /// Label for the activation button, derived from the URL.
    pub button_label: String,
}

impl PendingAction {
    /// Build a pending action for `url`, deriving the button label.
    #[must_use]
    pub fn for_url(url: impl Into<String>) -> Self {
        let url = url.into();
        let (button_label, is_direct_video) = classify_url(&url);
        Self {
            url,
            is_direct_video,
            button_label,
        }
    }
}

/// Derive a button label and direct-video flag from a URL.
///
/// Watch URLs label as "Play Video"; search URLs surface the decoded query;
/// a handful of well-known sites get named labels; everything else is a
/// plain "Open".
#[must_use]
pub fn classify_url(url: &str) -> (String, bool) {
    if let Some(rest) = url.split("watch?v=").nth(1) {
        let video_id: String = rest.chars().take_while(|c| *c != '&').collect();
        if !video_id.is_empty() {
            return ("Play Video".to_string(), true);
        }
        return ("Open".to_string(), true);
    }
    if let Some(rest) = url.split("results?search_query=").nth(1) {
        let raw_query: String = rest.chars().take_while(|c| *c != '&').collect();
        // '+' encodes a space in query strings; decode before percent-decoding.
        let spaced = raw_query.replace('+', " ");
        let query = urlencoding::decode(&spaced)
            .map(|q| q.into_owned())
            .unwrap_or(spaced);
        if query.is_empty() {
            return ("Search YouTube".to_string(), false);
        }
        return (format!("Search: {query}"), false);
    }
    if url.contains("youtube.com") {
        return ("Open YouTube".to_string(), false);
    }
    if url.contains("facebook.com") {
        return ("Open Facebook".to_string(), false);
    }
    if url.contains("linkedin.com") {
        return ("Open LinkedIn".to_string(), false);
    }
    if url.contains("google.com") {
        return ("Open Google".to_string(), false);
    }
    ("Open".to_string(), false)
}

/// Holds at most one pending action and mediates its activation.
pub struct PendingActionGate {
    pending: Option<PendingAction>,
    opener: Arc<dyn UrlOpener>,
    events: EventSink,
}

impl PendingActionGate {
    pub fn new(opener: Arc<dyn UrlOpener>, events: EventSink) -> Self {
        Self {
            pending: None,
            opener,
            events,
        }
    }

    /// The currently held action, if any.
    #[must_use]
    pub fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    /// Hold a new action and offer it to the user.
    ///
    /// A newer offer replaces any older one. While the offer is live the
    /// new-question affordance is hidden so the action button has the focus.
    pub fn offer(&mut self, action: PendingAction) {
        tracing::debug!(url = %action.url, label = %action.button_label, "offering pending action");
        self.events
            .emit(WidgetEvent::PendingActionOffered(action.clone()));
        self.events.emit(WidgetEvent::NewQuestionVisible(false));
        self.pending = Some(action);
    }

    /// Activate the held action in response to the user's click.
    ///
    /// On success the action is consumed; when the open was blocked the
    /// action stays held so the user can allow pop-ups and click again.
    pub fn activate(&mut self) {
        let Some(action) = self.pending.as_ref() else {
            return;
        };
        if self.opener.open(&action.url) {
            self.pending = None;
            self.events.emit(WidgetEvent::PendingActionCleared);
            self.events.emit(WidgetEvent::NewQuestionVisible(true));
        } else {
            tracing::warn!(url = %action.url, "pop-up blocked");
            self.events
                .emit(WidgetEvent::Warning(POPUP_BLOCKED_WARNING.to_string()));
        }
    }

    /// Discard the held action without opening it.
    pub fn clear(&mut self) {
        if self.pending.take().is_some() {
            self.events.emit(WidgetEvent::PendingActionCleared);
        }
    }
}
