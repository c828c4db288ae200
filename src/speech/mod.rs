//! Speech recognition input and synthesis output.
//!
//! Both sides are trait seams: the core never talks to a browser or OS
//! speech stack directly. A host supplies a [`RecognitionEngine`] and a
//! [`SynthesisEngine`]; when neither exists the widget degrades to
//! text-only operation.

pub mod input;
pub mod output;

pub use input::{
    ListenState, RecognitionEngine, RecognitionErrorKind, RecognitionEvent, SpeechInput,
};
pub use output::{select_voice, SpeechOutput, SynthesisEngine, Utterance, VoiceInfo};
