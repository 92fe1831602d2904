use std::io::{self, Read};
use std::os::fd::AsRawFd;
use std::process::{Child, ChildStdout, Command, Stdio};

use nix::fcntl::{fcntl, FcntlArg, OFlag};
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tracing::debug;

use prism_foundation::AudioError;

/// Which external program records the microphone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureBackend {
    /// PulseAudio/PipeWire recorder (`parec`).
    Parec,
    /// Generic recorder (`sox -d`).
    Sox,
}

impl CaptureBackend {
    pub fn command_name(self) -> &'static str {
        match self {
            CaptureBackend::Parec => "parec",
            CaptureBackend::Sox => "sox",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CaptureConfig {
    pub backend: CaptureBackend,
    pub sample_rate: u32,
    /// Source device name; empty selects the default device.
    pub device: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            backend: CaptureBackend::Parec,
            sample_rate: 44_100,
            device: String::new(),
        }
    }
}

/// A pollable stream of raw PCM bytes.
///
/// `read_available` must never block: it returns zero when no audio has
/// accumulated. `stop` is idempotent and safe to call after the
/// underlying process has already exited.
pub trait AudioSource {
    fn start(&mut self) -> Result<(), AudioError>;
    fn is_running(&self) -> bool;
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, AudioError>;
    fn stop(&mut self);
}

/// Capture stream backed by a child recording process.
pub struct CaptureStream {
    config: CaptureConfig,
    child: Option<(Child, ChildStdout)>,
}

impl CaptureStream {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            child: None,
        }
    }

    /// The full command line for the configured backend.
    fn command_line(config: &CaptureConfig) -> (&'static str, Vec<String>) {
        let name = config.backend.command_name();
        let args = match config.backend {
            CaptureBackend::Parec => {
                let mut args = vec![
                    "--record".to_string(),
                    format!("--rate={}", config.sample_rate),
                    "--channels=1".to_string(),
                ];
                if !config.device.is_empty() {
                    args.push(format!("--device={}", config.device));
                }
                args.push("--format=s16ne".to_string());
                args.push("--latency=10".to_string());
                args
            }
            CaptureBackend::Sox => vec![
                "-q".to_string(),
                "-V1".to_string(),
                "-d".to_string(),
                "--buffer".to_string(),
                "1000".to_string(),
                "-r".to_string(),
                config.sample_rate.to_string(),
                "-b".to_string(),
                "16".to_string(),
                "-e".to_string(),
                "signed-integer".to_string(),
                "-c".to_string(),
                "1".to_string(),
                "-t".to_string(),
                "raw".to_string(),
                "-L".to_string(),
                "-".to_string(),
            ],
        };
        (name, args)
    }
}

impl AudioSource for CaptureStream {
    fn start(&mut self) -> Result<(), AudioError> {
        if self.child.is_some() {
            return Ok(());
        }
        let (name, args) = Self::command_line(&self.config);
        debug!(command = name, ?args, "starting capture process");

        let mut child = Command::new(name)
            .args(&args)
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|source| {
                if source.kind() == io::ErrorKind::NotFound {
                    AudioError::ToolNotFound { name, source }
                } else {
                    AudioError::Spawn { name, source }
                }
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| AudioError::Pipe(io::Error::other("capture process has no stdout")))?;
        set_nonblocking(&stdout)?;

        self.child = Some((child, stdout));
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.child.is_some()
    }

    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, AudioError> {
        let Some((_, stdout)) = self.child.as_mut() else {
            return Err(AudioError::NotRunning);
        };
        match stdout.read(buf) {
            Ok(n) => Ok(n),
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => Ok(0),
            Err(err) => Err(AudioError::Pipe(err)),
        }
    }

    fn stop(&mut self) {
        if let Some((mut child, stdout)) = self.child.take() {
            drop(stdout);
            // The recorder exits on SIGINT; ESRCH just means it beat us to it.
            let _ = kill(Pid::from_raw(child.id() as i32), Signal::SIGINT);
            let _ = child.wait();
            debug!("capture process stopped");
        }
    }
}

impl Drop for CaptureStream {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Put the pipe in non-blocking mode so polling reads return promptly
/// even when no audio has accumulated.
fn set_nonblocking(stdout: &ChildStdout) -> Result<(), AudioError> {
    let fd = stdout.as_raw_fd();
    let bits = fcntl(fd, FcntlArg::F_GETFL).map_err(|e| AudioError::Pipe(io::Error::from(e)))?;
    let mut flags = OFlag::from_bits_retain(bits);
    flags.insert(OFlag::O_NONBLOCK);
    fcntl(fd, FcntlArg::F_SETFL(flags)).map_err(|e| AudioError::Pipe(io::Error::from(e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parec_command_line() {
        let (name, args) = CaptureStream::command_line(&CaptureConfig {
            backend: CaptureBackend::Parec,
            sample_rate: 16_000,
            device: String::new(),
        });
        assert_eq!(name, "parec");
        assert_eq!(
            args,
            [
                "--record",
                "--rate=16000",
                "--channels=1",
                "--format=s16ne",
                "--latency=10",
            ]
        );
    }

    #[test]
    fn parec_command_line_with_device() {
        let (_, args) = CaptureStream::command_line(&CaptureConfig {
            backend: CaptureBackend::Parec,
            sample_rate: 44_100,
            device: "alsa_input.usb".to_string(),
        });
        assert!(args.contains(&"--device=alsa_input.usb".to_string()));
    }

    #[test]
    fn sox_command_line_reads_from_default_device() {
        let (name, args) = CaptureStream::command_line(&CaptureConfig {
            backend: CaptureBackend::Sox,
            sample_rate: 44_100,
            device: String::new(),
        });
        assert_eq!(name, "sox");
        assert_eq!(args.last().map(String::as_str), Some("-"));
        assert!(args.contains(&"-L".to_string()));
    }

    #[test]
    fn stop_is_idempotent_without_a_child() {
        let mut stream = CaptureStream::new(CaptureConfig::default());
        assert!(!stream.is_running());
        stream.stop();
        stream.stop();
    }
}
