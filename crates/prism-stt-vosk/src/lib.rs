//! Vosk implementation of the `prism-stt` recognizer trait.

mod recognizer;

pub use recognizer::VoskRecognizer;
