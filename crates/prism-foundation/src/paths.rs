//! Locations under the user's configuration directory.
//!
//! Everything user-provided lives in `$XDG_CONFIG_HOME/prism-dictation/`
//! (falling back to `~/.config/prism-dictation/`): the optional text
//! filter executable and the default speech model directory.

use std::path::PathBuf;

pub const APP_NAME: &str = "prism-dictation";

/// Name of the optional user filter executable inside the config dir.
pub const USER_FILTER_NAME: &str = "process-text";

/// The user configuration directory, which may not exist yet.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| {
            // No XDG base and no home; keep a predictable relative path.
            PathBuf::from(".config")
        })
        .join(APP_NAME)
}

pub fn user_config_path(rest: &str) -> PathBuf {
    user_config_dir().join(rest)
}

/// Model directory used when `--model-dir` is not given.
pub fn default_model_dir() -> PathBuf {
    user_config_path("model")
}

/// Cookie path used when `--cookie` is not given.
pub fn default_cookie_path() -> PathBuf {
    std::env::temp_dir().join(format!("{APP_NAME}.cookie"))
}
