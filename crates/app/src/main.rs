//! Command line entry point.
//!
//! One long-running subcommand (`begin`) plus four lightweight sibling
//! invocations (`end`, `cancel`, `suspend`, `resume`) that control a
//! running session through its cookie. Diagnostics go to stderr;
//! stdout is reserved for the stdout output modes. `RUST_LOG`
//! overrides the `--verbose` derived log level.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::UNIX_EPOCH;

use anyhow::Context;
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use prism_app::control;
use prism_app::cookie::Cookie;
use prism_app::engine::{DictationEngine, EngineOptions, Outcome};
use prism_app::hook::HookSource;
use prism_app::pipeline::TextPipeline;
use prism_app::signals::ControlFlags;
use prism_audio::{AudioSource, CaptureBackend, CaptureConfig, CaptureStream};
use prism_foundation::paths;
use prism_stt::RecognizerConfig;
use prism_stt_vosk::VoskRecognizer;
use prism_text::{NumberOptions, ProcessOptions};
use prism_text_injection::{SimulateTool, TypingSink};

#[derive(Parser, Debug)]
#[command(
    name = "prism-dictation",
    about = "Offline push-to-talk speech to text for desktop Linux",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Begin dictation; runs until a sibling `end` or `cancel`.
    Begin(BeginArgs),
    /// End dictation, causing any deferred text to be typed in.
    End(CookieArgs),
    /// Cancel dictation without typing anything further.
    Cancel(CookieArgs),
    /// Suspend the dictation process: recording stops and the process
    /// is paused to remove any CPU overhead.
    Suspend(CookieArgs),
    /// Resume after `suspend`; does nothing when not suspended.
    Resume(CookieArgs),
}

#[derive(Args, Debug)]
struct CookieArgs {
    /// Location of the temporary cookie monitored to begin/end
    /// dictation.
    #[arg(long, value_name = "FILE_PATH")]
    cookie: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct BeginArgs {
    #[command(flatten)]
    cookie: CookieArgs,

    /// Override the user filter executable; pass an empty string to
    /// disable the user configuration entirely.
    #[arg(long, value_name = "FILE")]
    config: Option<String>,

    /// Path to the speech model directory (defaults to `model` in the
    /// user configuration directory).
    #[arg(long, value_name = "DIR")]
    model_dir: Option<PathBuf>,

    /// JSON grammar file restricting the recognized phrases, for
    /// better accuracy on constrained vocabularies.
    #[arg(long, value_name = "FILE")]
    grammar_file: Option<PathBuf>,

    /// Name of the recording device; the default device when empty.
    #[arg(long, value_name = "IDENTIFIER", default_value = "")]
    device: String,

    /// Recording sample rate in Hz.
    #[arg(long, value_name = "HZ", default_value_t = 44_100)]
    sample_rate: u32,

    /// Defer all output until dictation ends, instead of typing during
    /// speech (implied by `--output stdout`).
    #[arg(long)]
    defer_output: bool,

    /// For dictation kept enabled for extended periods: already
    /// finalized text is never re-processed on later updates.
    #[arg(long)]
    continuous: bool,

    /// End recording when no speech is recognized for this many
    /// seconds (zero disables).
    #[arg(long, value_name = "SECONDS", default_value_t = 0.0)]
    timeout: f64,

    /// Idle time between polls of the recorder. Zero is the most
    /// responsive at the cost of CPU; clamped to 0.5.
    #[arg(long, value_name = "SECONDS", default_value_t = 0.1)]
    idle_time: f64,

    /// Keep running this long after an end request, so push-to-talk
    /// can be released while finishing a word (zero disables).
    #[arg(long, value_name = "SECONDS", default_value_t = 0.0)]
    delay_exit: f64,

    /// Start the process and immediately suspend, for setups that
    /// drive dictation with resume/suspend instead of begin/end.
    #[arg(long)]
    suspend_on_start: bool,

    /// Prefix punctuation when the previous session ended within this
    /// many seconds (zero disables).
    #[arg(long, value_name = "SECONDS", default_value_t = 0.0)]
    punctuate_from_previous_timeout: f64,

    /// Capitalize the first character, and use a full stop instead of
    /// a comma for run-on punctuation.
    #[arg(long)]
    full_sentence: bool,

    /// Convert numbers into digits instead of whole words.
    #[arg(long)]
    numbers_as_digits: bool,

    /// Use comma separators for numbers.
    #[arg(long)]
    numbers_use_separator: bool,

    /// Keep numbers below this value as words, so "no one" does not
    /// become "no 1".
    #[arg(long, value_name = "N")]
    numbers_min_value: Option<u64>,

    /// Suppress number suffixes, so "first" does not become "1st".
    #[arg(long)]
    numbers_no_suffix: bool,

    /// Audio recording method.
    #[arg(long = "input", value_enum, default_value = "parec")]
    input_method: InputMethod,

    /// Where recognized text goes.
    #[arg(long, value_enum, default_value = "simulate-input")]
    output: OutputMethod,

    /// Program used to simulate keystrokes.
    #[arg(long, value_enum, default_value = "xdotool")]
    simulate_input_tool: SimulateInputTool,

    /// 0 errors only, 1 top-level actions, 2 internal details.
    #[arg(long, default_value_t = 0)]
    verbose: u8,

    /// Arguments after `--` are passed to the user filter.
    #[arg(last = true)]
    rest: Vec<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum InputMethod {
    /// PulseAudio/PipeWire recording (see `--device`).
    Parec,
    Sox,
}

impl From<InputMethod> for CaptureBackend {
    fn from(method: InputMethod) -> Self {
        match method {
            InputMethod::Parec => CaptureBackend::Parec,
            InputMethod::Sox => CaptureBackend::Sox,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMethod {
    /// Simulate keystrokes into the focused window (default).
    SimulateInput,
    /// Print to standard output; stderr carries any diagnostics.
    Stdout,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum SimulateInputTool {
    /// X server only (default).
    Xdotool,
    /// Any Linux, including Wayland.
    Dotool,
    /// Like dotool, for use with the dotoold daemon.
    Dotoolc,
    /// Wayland, needs the ydotoold service.
    Ydotool,
    /// Wayland.
    Wtype,
    /// Bare stdout with Ctrl-H for backspace.
    Stdout,
}

impl From<SimulateInputTool> for SimulateTool {
    fn from(tool: SimulateInputTool) -> Self {
        match tool {
            SimulateInputTool::Xdotool => SimulateTool::Xdotool,
            SimulateInputTool::Dotool => SimulateTool::Dotool,
            SimulateInputTool::Dotoolc => SimulateTool::Dotoolc,
            SimulateInputTool::Ydotool => SimulateTool::Ydotool,
            SimulateInputTool::Wtype => SimulateTool::Wtype,
            SimulateInputTool::Stdout => SimulateTool::Stdout,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        let _ = Cli::command().print_help();
        return ExitCode::SUCCESS;
    };
    init_logging(&command);

    let result = match command {
        CliCommand::Begin(args) => begin(args),
        CliCommand::End(args) => {
            control::end(&Cookie::new(args.cookie)).map_err(Into::into)
        }
        CliCommand::Cancel(args) => {
            control::cancel(&Cookie::new(args.cookie)).map_err(Into::into)
        }
        CliCommand::Suspend(args) => {
            control::suspend(&Cookie::new(args.cookie));
            Ok(())
        }
        CliCommand::Resume(args) => {
            control::resume(&Cookie::new(args.cookie));
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(command: &CliCommand) {
    let default_level = match command {
        CliCommand::Begin(args) => match args.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        },
        // The sibling suspend/resume report their "nothing running"
        // notes at info level.
        CliCommand::Suspend(_) | CliCommand::Resume(_) => "info",
        _ => "warn",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn begin(args: BeginArgs) -> anyhow::Result<()> {
    let cookie = Cookie::new(args.cookie.cookie.clone());

    // Whether the previous session ended recently enough that this one
    // continues its sentence. Must be read before the cookie is
    // overwritten below.
    let run_on = args.punctuate_from_previous_timeout > 0.0
        && cookie
            .age()
            .is_some_and(|age| age.as_secs_f64() < args.punctuate_from_previous_timeout);

    cookie.create_for(std::process::id())?;
    if cookie.mtime() != Some(UNIX_EPOCH) {
        // A sibling raced us between create and now; unlikely, but
        // respect the request.
        eprintln!("Cookie removed right after creation, aborting the session");
        return Ok(());
    }

    let progressive = !(args.defer_output || args.output == OutputMethod::Stdout);

    let mut audio = CaptureStream::new(CaptureConfig {
        backend: args.input_method.into(),
        sample_rate: args.sample_rate,
        device: args.device.clone(),
    });
    if !args.suspend_on_start {
        // Recording starts before the model load so nothing spoken
        // during startup is lost; the pipe buffers it.
        audio.start()?;
    }

    let model_dir = args
        .model_dir
        .clone()
        .unwrap_or_else(paths::default_model_dir);
    let recognizer = VoskRecognizer::new(&RecognizerConfig {
        model_dir,
        grammar_file: args.grammar_file.clone(),
        sample_rate: args.sample_rate,
    })?;

    let sink = match args.output {
        OutputMethod::Stdout => TypingSink::new(SimulateTool::Stdout),
        OutputMethod::SimulateInput => TypingSink::new(args.simulate_input_tool.into()),
    };

    let pipeline = TextPipeline::new(
        ProcessOptions {
            full_sentence: args.full_sentence,
            numbers_as_digits: args.numbers_as_digits,
            numbers: NumberOptions {
                use_separator: args.numbers_use_separator,
                min_value: args.numbers_min_value,
                no_suffix: args.numbers_no_suffix,
            },
        },
        hook_source(args.config.as_deref()),
        args.rest.clone(),
        run_on,
    );

    let flags = ControlFlags::new();
    flags.install().context("installing signal handlers")?;

    let options = EngineOptions {
        progressive,
        progressive_continuous: args.continuous,
        timeout: args.timeout,
        idle_time: clamp_idle_time(args.idle_time),
        delay_exit: args.delay_exit,
        suspend_on_start: args.suspend_on_start,
    };
    let mut engine = DictationEngine::new(
        recognizer,
        sink,
        audio,
        pipeline,
        flags,
        cookie.clone(),
        options,
    );

    match engine.run()? {
        Outcome::Canceled => {
            eprintln!("Text input canceled!");
        }
        Outcome::Completed { handled_any: false } => {
            eprintln!("No text found in the audio");
            // Keep run-on punctuation from continuing a session that
            // recorded nothing.
            cookie.touch()?;
        }
        Outcome::Completed { .. } => {}
    }
    Ok(())
}

fn hook_source(config: Option<&str>) -> HookSource {
    match config {
        None => HookSource::Default,
        Some("") => HookSource::Disabled,
        Some(path) => HookSource::Override(PathBuf::from(path)),
    }
}

/// Polling any faster than twice a second stops paying off.
fn clamp_idle_time(requested: f64) -> f64 {
    requested.min(0.5)
}
