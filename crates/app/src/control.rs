//! Sibling-invocation side of the control plane: `end`, `cancel`,
//! `suspend` and `resume` all act on a running engine through its
//! cookie. Everything here is best-effort; a missing cookie just means
//! nothing is running.

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tracing::info;

use prism_foundation::CookieError;

use crate::cookie::Cookie;

/// Request the running engine to finish and type its text.
pub fn end(cookie: &Cookie) -> Result<(), CookieError> {
    // Resume first (a no-op when not suspended) so a suspended engine
    // still observes the request.
    signal_owner(cookie, Signal::SIGCONT);
    cookie.touch()
}

/// Abort the running engine without emitting any residual text.
pub fn cancel(cookie: &Cookie) -> Result<(), CookieError> {
    signal_owner(cookie, Signal::SIGCONT);
    cookie.remove();
    Ok(())
}

/// Park the engine: recording stops and the process is stopped so it
/// costs nothing while idle.
pub fn suspend(cookie: &Cookie) {
    signal_owner(cookie, Signal::SIGUSR1);
}

/// Undo a previous `suspend`; does nothing when not suspended.
pub fn resume(cookie: &Cookie) {
    signal_owner(cookie, Signal::SIGCONT);
}

fn signal_owner(cookie: &Cookie, signal: Signal) {
    let Some(pid) = cookie.read_pid() else {
        info!(
            "no running dictation cookie found at {}, abort",
            cookie.path().display()
        );
        return;
    };
    if let Err(err) = kill(Pid::from_raw(pid), signal) {
        info!(%err, pid, "could not signal the dictation process");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::UNIX_EPOCH;

    fn temp_cookie() -> (tempfile::TempDir, Cookie) {
        let dir = tempfile::tempdir().unwrap();
        let cookie = Cookie::new(Some(dir.path().join("control.cookie")));
        (dir, cookie)
    }

    #[test]
    fn end_touches_the_cookie() {
        let (_dir, cookie) = temp_cookie();
        cookie.create_for(std::process::id()).unwrap();
        end(&cookie).unwrap();
        assert_ne!(cookie.mtime(), Some(UNIX_EPOCH));
    }

    #[test]
    fn end_without_a_cookie_still_leaves_one() {
        // So the next begin sees a recent end for run-on punctuation.
        let (_dir, cookie) = temp_cookie();
        end(&cookie).unwrap();
        assert!(cookie.mtime().is_some());
    }

    #[test]
    fn cancel_removes_the_cookie() {
        let (_dir, cookie) = temp_cookie();
        cookie.create_for(std::process::id()).unwrap();
        cancel(&cookie).unwrap();
        assert_eq!(cookie.mtime(), None);
    }

    #[test]
    fn suspend_without_a_cookie_is_silent() {
        let (_dir, cookie) = temp_cookie();
        suspend(&cookie);
        resume(&cookie);
    }
}
