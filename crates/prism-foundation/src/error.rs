use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DictationError {
    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error(transparent)]
    Stt(#[from] SttError),

    #[error(transparent)]
    Injection(#[from] InjectionError),

    #[error(transparent)]
    Hook(#[from] HookError),

    #[error(transparent)]
    Cookie(#[from] CookieError),
}

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Command {name:?} not found: {source}")]
    ToolNotFound {
        name: &'static str,
        source: std::io::Error,
    },

    #[error("Failed to start {name:?}: {source}")]
    Spawn {
        name: &'static str,
        source: std::io::Error,
    },

    #[error("Recording pipe error: {0}")]
    Pipe(#[from] std::io::Error),

    #[error("The recording process is not running")]
    NotRunning,
}

#[derive(Error, Debug)]
pub enum SttError {
    #[error(
        "Please download the model from https://alphacephei.com/vosk/models \
         and unpack it to {path:?}"
    )]
    ModelNotFound { path: PathBuf },

    #[error("Failed to load the speech model from {path:?}")]
    ModelLoadFailed { path: PathBuf },

    #[error("Failed to create a recognizer at {sample_rate} Hz")]
    RecognizerInit { sample_rate: u32 },

    #[error("Failed to read grammar file {path:?}: {source}")]
    GrammarRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Grammar file {path:?} is not a JSON list of phrases: {reason}")]
    GrammarParse { path: PathBuf, reason: String },

    #[error("Recognition failed: {0}")]
    Decode(String),
}

#[derive(Error, Debug)]
pub enum InjectionError {
    #[error("Command {name:?} not found: {source}")]
    ToolNotFound {
        name: &'static str,
        source: std::io::Error,
    },

    #[error("{name} exited with {status}")]
    CommandFailed {
        name: &'static str,
        status: ExitStatus,
    },

    #[error("I/O error talking to {name}: {source}")]
    Io {
        name: &'static str,
        source: std::io::Error,
    },

    #[error("{name} is not running")]
    NotRunning { name: &'static str },
}

#[derive(Error, Debug)]
pub enum HookError {
    #[error("User filter {path:?} not found")]
    NotFound { path: PathBuf },

    #[error("Failed to run {path:?}: {reason}")]
    Run { path: PathBuf, reason: String },

    #[error("{path:?} exited with {status}")]
    Failed { path: PathBuf, status: ExitStatus },

    #[error("{path:?} returned non-text output instead of a string")]
    NotText { path: PathBuf },
}

#[derive(Error, Debug)]
pub enum CookieError {
    #[error("Cookie {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
