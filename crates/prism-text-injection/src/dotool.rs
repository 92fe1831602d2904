//! Injection through a persistent `dotool` (or `dotoolc`) child.
//!
//! Unlike the per-call tools, `dotool` reads command lines from stdin
//! for its whole lifetime, so the injector owns the child and its pipe.
//! `setup` spawns it and writes the timing parameters; `teardown`
//! interrupts it. Suspend/resume cycles go through a full
//! teardown/setup so no child outlives a paused session.

use std::io::{self, Write};
use std::process::{Child, Command, Stdio};

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tracing::debug;

use prism_foundation::InjectionError;

/// Timing parameters written to the child right after spawn.
const INIT_PARAMS: &str = "keydelay 4\nkeyhold 0\ntypedelay 12\ntypehold 0\n";

pub(crate) struct DotoolInjector {
    /// `dotool` talks to the devices directly; `dotoolc` relays through
    /// a running `dotoold` daemon.
    command: &'static str,
    child: Option<Child>,
}

impl DotoolInjector {
    pub fn new(command: &'static str) -> Self {
        Self {
            command,
            child: None,
        }
    }

    pub fn setup(&mut self) -> Result<(), InjectionError> {
        let name = self.command;
        debug_assert!(self.child.is_none(), "setup without matching teardown");

        let mut child = Command::new(name)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|source| {
                if source.kind() == io::ErrorKind::NotFound {
                    InjectionError::ToolNotFound { name, source }
                } else {
                    InjectionError::Io { name, source }
                }
            })?;

        let stdin = child
            .stdin
            .as_mut()
            .ok_or(InjectionError::NotRunning { name })?;
        stdin
            .write_all(INIT_PARAMS.as_bytes())
            .and_then(|()| stdin.flush())
            .map_err(|source| InjectionError::Io { name, source })?;

        self.child = Some(child);
        Ok(())
    }

    pub fn teardown(&mut self) -> Result<(), InjectionError> {
        if let Some(mut child) = self.child.take() {
            let _ = kill(Pid::from_raw(child.id() as i32), Signal::SIGINT);
            let _ = child.wait();
            debug!(command = self.command, "typing child stopped");
        }
        Ok(())
    }

    pub fn emit(&mut self, delete_prev: usize, text: &str) -> Result<(), InjectionError> {
        let name = self.command;
        let child = self
            .child
            .as_mut()
            .ok_or(InjectionError::NotRunning { name })?;
        let stdin = child
            .stdin
            .as_mut()
            .ok_or(InjectionError::NotRunning { name })?;

        let io_err = |source| InjectionError::Io { name, source };

        if delete_prev > 0 {
            let mut line = String::from("key");
            for _ in 0..delete_prev {
                line.push_str(" backspace");
            }
            line.push('\n');
            stdin.write_all(line.as_bytes()).map_err(io_err)?;
            stdin.flush().map_err(io_err)?;
        }

        writeln!(stdin, "type {text}").map_err(io_err)?;
        stdin.flush().map_err(io_err)
    }
}

impl Drop for DotoolInjector {
    fn drop(&mut self) {
        let _ = self.teardown();
    }
}
