//! Foundation types for prism-dictation: error enums shared across the
//! workspace and resolution of the user configuration directory.

pub mod error;
pub mod paths;

pub use error::{
    AudioError, CookieError, DictationError, HookError, InjectionError, SttError,
};
