//! Speech synthesis output adapter and voice selection.

use crate::settings::Settings;
use std::sync::Arc;

/// Preferred voice names, tried in order against the engine's voice list.
pub const VOICE_PRIORITY: [&str; 8] = [
    "Google US English",
    "Google UK English Female",
    "Microsoft David",
    "Microsoft Zira",
    "Samantha",
    "Alex",
    "Google UK English Male",
    "Microsoft Mark",
];

/// A voice offered by a synthesis engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceInfo {
    pub name: String,
    /// BCP 47 language tag, e.g. `en-US`.
    pub lang: String,
}

/// One fully configured utterance handed to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    /// Selected voice name, when one matched.
    pub voice: Option<String>,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    pub lang: String,
}

/// A text-to-speech engine.
///
/// Whether `speak` queues behind or replaces an in-flight utterance is
/// implementation-defined; the widget always calls
/// [`SynthesisEngine::cancel`] first when it wants a clean cut.
pub trait SynthesisEngine: Send + Sync {
    /// Voices currently offered by the engine.
    fn voices(&self) -> Vec<VoiceInfo>;
    /// Speak one utterance.
    fn speak(&self, utterance: Utterance);
    /// Stop any in-flight speech immediately.
    fn cancel(&self);
}

/// Pick the best available voice.
///
/// Tries each [`VOICE_PRIORITY`] name as a substring match first, then falls
/// back to any English-language voice that is not an eSpeak voice.
#[must_use]
pub fn select_voice(voices: &[VoiceInfo]) -> Option<&VoiceInfo> {
    for preferred in VOICE_PRIORITY {
        if let Some(voice) = voices.iter().find(|v| v.name.contains(preferred)) {
            return Some(voice);
        }
    }
    voices
        .iter()
        .find(|v| v.lang.starts_with("en") && !v.name.contains("eSpeak"))
}

/// Output adapter around an optional injected [`SynthesisEngine`].
#[derive(Clone)]
pub struct SpeechOutput {
    engine: Option<Arc<dyn SynthesisEngine>>,
}

impl SpeechOutput {
    /// Create the adapter. Passing `None` makes speech a silent no-op.
    #[must_use]
    pub fn new(engine: Option<Arc<dyn SynthesisEngine>>) -> Self {
        Self { engine }
    }

    /// Speak `text` with the given settings applied.
    ///
    /// No-op when auto-speak is disabled or no engine exists. Cancels any
    /// in-flight utterance first so replies never overlap.
    pub fn speak(&self, text: &str, settings: &Settings) {
        if !settings.auto_speak {
            return;
        }
        let Some(engine) = self.engine.as_ref() else {
            return;
        };
        engine.cancel();
        let voices = engine.voices();
        let voice = select_voice(&voices).map(|v| v.name.clone());
        tracing::debug!(?voice, "speaking reply");
        engine.speak(Utterance {
            text: text.to_string(),
            voice,
            rate: settings.voice_rate,
            pitch: settings.voice_pitch,
            volume: settings.voice_volume,
            lang: "en-US".to_string(),
        });
    }

    /// Stop any in-flight speech.
    pub fn cancel(&self) {
        if let Some(engine) = self.engine.as_ref() {
            engine.cancel();
        }
    }
}
