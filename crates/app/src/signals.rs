//! Signal handling for the dictation engine.
//!
//! Handlers only flip atomic flags; everything with side effects
//! (closing pipes, resetting the recognizer, sink teardown) runs in the
//! dictation loop after it observes a flag. Doing that work in a
//! handler would re-enter the recognizer.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use signal_hook::consts::{SIGCONT, SIGHUP, SIGTSTP, SIGUSR1};

#[derive(Clone, Debug, Default)]
pub struct ControlFlags {
    suspend: Arc<AtomicBool>,
    resume: Arc<AtomicBool>,
    reload: Arc<AtomicBool>,
}

impl ControlFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the process signal handlers:
    /// SIGUSR1 and SIGTSTP request a suspend, SIGCONT a resume, and
    /// SIGHUP a reload of the user configuration. SIGTSTP is included
    /// so Ctrl+Z at a controlling terminal parks the session cleanly.
    pub fn install(&self) -> io::Result<()> {
        signal_hook::flag::register(SIGUSR1, self.suspend.clone())?;
        signal_hook::flag::register(SIGTSTP, self.suspend.clone())?;
        signal_hook::flag::register(SIGCONT, self.resume.clone())?;
        signal_hook::flag::register(SIGHUP, self.reload.clone())?;
        Ok(())
    }

    pub fn take_suspend(&self) -> bool {
        self.suspend.swap(false, Ordering::SeqCst)
    }

    pub fn take_resume(&self) -> bool {
        self.resume.swap(false, Ordering::SeqCst)
    }

    pub fn take_reload(&self) -> bool {
        self.reload.swap(false, Ordering::SeqCst)
    }

    pub fn request_suspend(&self) {
        self.suspend.store(true, Ordering::SeqCst);
    }

    pub fn request_resume(&self) {
        self.resume.store(true, Ordering::SeqCst);
    }

    pub fn request_reload(&self) {
        self.reload.store(true, Ordering::SeqCst);
    }
}

/// Park the whole process until a SIGCONT arrives.
pub fn raise_stop() {
    let _ = nix::sys::signal::raise(nix::sys::signal::Signal::SIGSTOP);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_clear_once_taken() {
        let flags = ControlFlags::new();
        assert!(!flags.take_suspend());
        flags.request_suspend();
        assert!(flags.take_suspend());
        assert!(!flags.take_suspend());

        flags.request_resume();
        flags.request_reload();
        assert!(flags.take_resume());
        assert!(flags.take_reload());
    }

    #[test]
    fn clones_share_state() {
        let flags = ControlFlags::new();
        let alias = flags.clone();
        alias.request_reload();
        assert!(flags.take_reload());
    }
}
