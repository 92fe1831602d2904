//! Audio capture for prism-dictation.
//!
//! Recording is delegated to an external capture program (`parec` or
//! `sox`) producing raw signed 16-bit mono PCM on its standard output.
//! The pipe is switched to non-blocking mode so the dictation loop can
//! poll it without ever stalling.

mod capture;

pub use capture::{AudioSource, CaptureBackend, CaptureConfig, CaptureStream};
