//! The widget controller: wires every component together and drives them
//! from named user intents.

use crate::api::AssistantClient;
use crate::command::{CommandMatcher, SpecialCommandRunner};
use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::events::{event_channel, EventSink, UiIntent, WidgetEvent};
use crate::gate::{PendingActionGate, UrlOpener};
use crate::render::{Renderer, StatusLine, STATUS_IDLE};
use crate::settings::{Settings, SettingsStore};
use crate::speech::{RecognitionEngine, RecognitionEvent, SpeechInput, SpeechOutput, SynthesisEngine};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Status shown briefly after settings are persisted.
const STATUS_SETTINGS_SAVED: &str = "Settings saved successfully!";
/// How long the saved-settings confirmation stays on the status line.
const SETTINGS_SAVED_TTL: Duration = Duration::from_secs(2);
/// Pause before listening restarts when the user asks a new question.
const NEW_QUESTION_LISTEN_DELAY: Duration = Duration::from_millis(300);

/// Pluggable pieces a host hands to [`Widget::new`].
///
/// Every engine is optional; a widget with no engines still handles typed
/// commands.
pub struct WidgetParts {
    pub recognition: Option<Box<dyn RecognitionEngine>>,
    pub synthesis: Option<Arc<dyn SynthesisEngine>>,
    pub opener: Arc<dyn UrlOpener>,
    pub matcher: Arc<dyn CommandMatcher>,
}

/// The assistant widget core.
///
/// Consumes [`UiIntent`] values, emits [`WidgetEvent`] values. Owns all
/// state; the presentation layer is a pure view over the event stream.
pub struct Widget {
    store: SettingsStore,
    settings: Settings,
    input: SpeechInput,
    renderer: Renderer,
    dispatcher: Dispatcher,
    gate: PendingActionGate,
    post: SpecialCommandRunner,
    status: StatusLine,
    events: EventSink,
    settings_revert_task: Option<JoinHandle<()>>,
}

impl Widget {
    /// Build the widget and return it with the receiving half of its event
    /// stream.
    ///
    /// Loads persisted settings, applies them, and announces availability of
    /// voice input and the initial idle status.
    pub fn new(
        client: AssistantClient,
        store: SettingsStore,
        parts: WidgetParts,
    ) -> (Self, mpsc::UnboundedReceiver<WidgetEvent>) {
        let (events, rx) = event_channel();
        let status = StatusLine::new(events.clone());
        let settings = store.load();

        let speech_out = SpeechOutput::new(parts.synthesis);
        let input = SpeechInput::new(parts.recognition, status.clone(), events.clone());
        let renderer = Renderer::new(events.clone(), speech_out, settings.clone());
        let dispatcher = Dispatcher::new(client.clone(), status.clone(), events.clone());
        let gate = PendingActionGate::new(Arc::clone(&parts.opener), events.clone());
        let post = SpecialCommandRunner::new(parts.matcher, client, parts.opener, events.clone());

        let mut widget = Self {
            store,
            settings,
            input,
            renderer,
            dispatcher,
            gate,
            post,
            status,
            events,
            settings_revert_task: None,
        };
        widget.apply_settings_to_view();
        widget
            .events
            .emit(WidgetEvent::MicAvailable(widget.input.available()));
        widget.status.set(STATUS_IDLE);
        (widget, rx)
    }

    /// Current settings snapshot.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Handle one user intent.
    pub async fn handle_intent(&mut self, intent: UiIntent) -> Result<()> {
        match intent {
            UiIntent::ToggleListening => self.input.toggle(),
            UiIntent::SubmitText(text) => {
                self.dispatch(&text).await;
                Ok(())
            }
            UiIntent::NewQuestion => self.new_question().await,
            UiIntent::ActivatePendingAction => {
                self.gate.activate();
                Ok(())
            }
            UiIntent::SaveSettings(settings) => self.save_settings(settings),
            UiIntent::ResetSettings => {
                let defaults = self.store.reset()?;
                self.install_settings(defaults);
                Ok(())
            }
        }
    }

    /// Handle an event reported by the recognition engine.
    ///
    /// A final transcript is dispatched exactly like typed text.
    pub async fn handle_recognition_event(&mut self, event: RecognitionEvent) {
        if let Some(transcript) = self.input.handle_event(event) {
            self.dispatch(&transcript).await;
        }
    }

    async fn dispatch(&mut self, command: &str) {
        self.dispatcher
            .dispatch(command, &mut self.renderer, &mut self.gate, &self.post)
            .await;
    }

    /// Return to the welcome view, drop any pending action, and re-arm
    /// listening after a short pause.
    async fn new_question(&mut self) -> Result<()> {
        self.renderer.reset();
        self.gate.clear();
        self.status.set(STATUS_IDLE);
        if self.input.available() {
            tokio::time::sleep(NEW_QUESTION_LISTEN_DELAY).await;
            self.input.start_listening()?;
        }
        Ok(())
    }

    fn save_settings(&mut self, settings: Settings) -> Result<()> {
        self.store.save(&settings)?;
        self.install_settings(settings);

        self.status.set(STATUS_SETTINGS_SAVED);
        if let Some(task) = self.settings_revert_task.take() {
            task.abort();
        }
        let status = self.status.clone();
        self.settings_revert_task = Some(tokio::spawn(async move {
            tokio::time::sleep(SETTINGS_SAVED_TTL).await;
            status.restore_idle_if(STATUS_SETTINGS_SAVED);
        }));
        Ok(())
    }

    fn install_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.renderer.apply_settings(self.settings.clone());
        self.apply_settings_to_view();
    }

    fn apply_settings_to_view(&self) {
        self.events.emit(WidgetEvent::StyleBlock(
            self.settings.animation_style_block(),
        ));
        self.events.emit(WidgetEvent::Theme {
            hex: self.settings.theme_color.hex(),
        });
        self.events.emit(WidgetEvent::Glow {
            enabled: self.settings.enable_glow,
        });
    }
}
