//! Command dispatch: one command in flight at a time, animated loading
//! status, reply routing and failure messaging.

use crate::api::AssistantClient;
use crate::command::SpecialCommandRunner;
use crate::error::WidgetError;
use crate::events::{EventSink, ViewState, WidgetEvent};
use crate::gate::{PendingAction, PendingActionGate};
use crate::render::{Renderer, StatusLine, STATUS_IDLE, STATUS_RETRY};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Reply text shown when the service failed or answered unusably.
pub const GENERIC_FAILURE: &str = "Sorry, something went wrong. Please try again.";
/// Reply text shown when the network is unreachable.
pub const OFFLINE_FAILURE: &str = "No internet connection. Please check your network.";

/// Cadence of the animated "Processing" dots.
const LOADING_TICK: Duration = Duration::from_millis(400);

/// Sends commands to the service and routes the outcome.
///
/// Overlapping dispatches are rejected, not queued: while one command is in
/// flight, further submissions are dropped with a debug log.
pub struct Dispatcher {
    client: AssistantClient,
    status: StatusLine,
    events: EventSink,
    busy: bool,
    loading_task: Option<JoinHandle<()>>,
}

impl Dispatcher {
    pub fn new(client: AssistantClient, status: StatusLine, events: EventSink) -> Self {
        Self {
            client,
            status,
            events,
            busy: false,
            loading_task: None,
        }
    }

    /// Whether a command is currently in flight.
    #[must_use]
    pub fn busy(&self) -> bool {
        self.busy
    }

    /// Dispatch one command end to end.
    ///
    /// Shows the user's message, animates the status line while waiting,
    /// then either reveals the reply (offering a pending action and running
    /// keyword side-effects) or reveals a failure message with the retry
    /// status.
    pub async fn dispatch(
        &mut self,
        raw: &str,
        renderer: &mut Renderer,
        gate: &mut PendingActionGate,
        post: &SpecialCommandRunner,
    ) {
        let command = raw.trim();
        if command.is_empty() {
            return;
        }
        if self.busy {
            tracing::debug!(%command, "dispatch rejected, command already in flight");
            return;
        }
        self.busy = true;

        renderer.show_user_message(command);
        self.events.emit(WidgetEvent::View(ViewState::Conversation));
        self.start_loading();

        let outcome = self.client.process(command).await;
        self.stop_loading();

        match outcome {
            Ok(reply) => {
                let pending = reply.pending_action_url().map(PendingAction::for_url);
                renderer.show_assistant_message(&reply.response);
                self.status.set(STATUS_IDLE);
                if let Some(action) = pending {
                    gate.offer(action);
                }
                post.run(&command.to_lowercase()).await;
            }
            Err(e) => {
                let message = match &e {
                    WidgetError::Offline => OFFLINE_FAILURE,
                    _ => GENERIC_FAILURE,
                };
                tracing::warn!(error = %e, "command dispatch failed");
                renderer.show_assistant_message(message);
                self.status.set(STATUS_RETRY);
            }
        }

        self.busy = false;
    }

    /// Animate the status line: "Processing" with zero to three dots,
    /// advancing every tick.
    fn start_loading(&mut self) {
        if let Some(task) = self.loading_task.take() {
            task.abort();
        }
        let status = self.status.clone();
        self.loading_task = Some(tokio::spawn(async move {
            status.set("Processing");
            let mut interval = tokio::time::interval(LOADING_TICK);
            // The first tick completes immediately.
            interval.tick().await;
            let mut dots = 0usize;
            loop {
                interval.tick().await;
                dots = (dots + 1) % 4;
                status.set(format!("Processing{}", ".".repeat(dots)));
            }
        }));
    }

    fn stop_loading(&mut self) {
        if let Some(task) = self.loading_task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use crate::command::KeywordMatcher;
    use crate::events::event_channel;
    use crate::gate::UrlOpener;
    use crate::settings::Settings;
    use crate::speech::SpeechOutput;
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct NullOpener;

    impl UrlOpener for NullOpener {
        fn open(&self, _url: &str) -> bool {
            true
        }
    }

    struct Harness {
        dispatcher: Dispatcher,
        renderer: Renderer,
        gate: PendingActionGate,
        post: SpecialCommandRunner,
        status: StatusLine,
        rx: tokio::sync::mpsc::UnboundedReceiver<WidgetEvent>,
    }

    fn harness(base_url: &str) -> Harness {
        let (sink, rx) = event_channel();
        let status = StatusLine::new(sink.clone());
        let client = AssistantClient::new(base_url);
        let opener: Arc<dyn UrlOpener> = Arc::new(NullOpener);
        Harness {
            dispatcher: Dispatcher::new(client.clone(), status.clone(), sink.clone()),
            renderer: Renderer::new(sink.clone(), SpeechOutput::new(None), Settings::default())
                .with_reveal_delay(Duration::ZERO),
            gate: PendingActionGate::new(Arc::clone(&opener), sink.clone()),
            post: SpecialCommandRunner::new(Arc::new(KeywordMatcher), client, opener, sink)
                .with_open_delay(Duration::ZERO),
            status,
            rx,
        }
    }

    #[tokio::test]
    async fn empty_command_is_ignored() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/process"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut h = harness(&server.uri());
        h.dispatcher
            .dispatch("   ", &mut h.renderer, &mut h.gate, &h.post)
            .await;
        assert!(!h.dispatcher.busy());
    }

    #[tokio::test]
    async fn successful_dispatch_reveals_reply_and_returns_to_idle() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/process"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": "Hello there!"
            })))
            .mount(&server)
            .await;

        let mut h = harness(&server.uri());
        h.dispatcher
            .dispatch("hello", &mut h.renderer, &mut h.gate, &h.post)
            .await;

        assert_eq!(h.status.current(), STATUS_IDLE);
        assert!(h.gate.pending().is_none());

        let mut saw_user = false;
        let mut saw_reveal = false;
        while let Ok(event) = h.rx.try_recv() {
            match event {
                WidgetEvent::UserMessage { text, .. } => {
                    assert_eq!(text, "hello");
                    saw_user = true;
                }
                WidgetEvent::RevealStarted { .. } => saw_reveal = true,
                _ => {}
            }
        }
        assert!(saw_user);
        assert!(saw_reveal);
    }

    #[tokio::test]
    async fn pending_action_reply_is_offered_through_the_gate() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/process"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": "Here is the video",
                "action": "pending_action",
                "url": "https://www.youtube.com/watch?v=abc123"
            })))
            .mount(&server)
            .await;

        let mut h = harness(&server.uri());
        h.dispatcher
            .dispatch("show me a video", &mut h.renderer, &mut h.gate, &h.post)
            .await;

        let pending = h.gate.pending().unwrap();
        assert_eq!(pending.button_label, "Play Video");
        assert!(pending.is_direct_video);
    }

    #[tokio::test]
    async fn server_error_shows_generic_failure_and_retry_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/process"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut h = harness(&server.uri());
        h.dispatcher
            .dispatch("hello", &mut h.renderer, &mut h.gate, &h.post)
            .await;

        assert_eq!(h.status.current(), STATUS_RETRY);
        let mut revealed = String::new();
        let mut collecting = false;
        while let Ok(event) = h.rx.try_recv() {
            match event {
                WidgetEvent::RevealStarted { .. } => collecting = true,
                WidgetEvent::RevealChar(c) if collecting => revealed.push(c),
                WidgetEvent::RevealFinished => break,
                _ => {}
            }
        }
        // The reveal task may still be running; wait for the remainder.
        while revealed.len() < GENERIC_FAILURE.len() {
            match h.rx.recv().await {
                Some(WidgetEvent::RevealChar(c)) => revealed.push(c),
                Some(WidgetEvent::RevealFinished) | None => break,
                Some(_) => {}
            }
        }
        assert_eq!(revealed, GENERIC_FAILURE);
    }

    #[tokio::test]
    async fn unreachable_service_shows_offline_failure() {
        let mut h = harness("http://127.0.0.1:1");
        h.dispatcher
            .dispatch("hello", &mut h.renderer, &mut h.gate, &h.post)
            .await;

        assert_eq!(h.status.current(), STATUS_RETRY);
        let mut revealed = String::new();
        loop {
            match h.rx.recv().await {
                Some(WidgetEvent::RevealChar(c)) => revealed.push(c),
                Some(WidgetEvent::RevealFinished) | None => break,
                Some(_) => {}
            }
        }
        assert_eq!(revealed, OFFLINE_FAILURE);
    }

    #[tokio::test]
    async fn loading_status_animates_dots() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/process"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "response": "done" }))
                    .set_delay(Duration::from_millis(900)),
            )
            .mount(&server)
            .await;

        let mut h = harness(&server.uri());
        h.dispatcher
            .dispatch("slow question", &mut h.renderer, &mut h.gate, &h.post)
            .await;

        let mut statuses = Vec::new();
        while let Ok(event) = h.rx.try_recv() {
            if let WidgetEvent::Status(s) = event {
                statuses.push(s);
            }
        }
        assert!(statuses.iter().any(|s| s == "Processing"));
        assert!(statuses.iter().any(|s| s == "Processing."));
        // After completion the animation stops at idle.
        assert_eq!(h.status.current(), STATUS_IDLE);
    }
}
