//! The control cookie shared between the engine and sibling
//! invocations.
//!
//! The file's contents are the engine's pid; its modification time is
//! the actual signal. A forced zero mtime means dictation is running,
//! any other mtime means an end was requested, and a missing file means
//! cancel. Forcing the mtime to zero right after creation lets a fast
//! begin/end tap land before the loop starts and still read as an end.

use std::fs::{self, FileTimes, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use prism_foundation::paths;
use prism_foundation::CookieError;

#[derive(Debug, Clone)]
pub struct Cookie {
    path: PathBuf,
}

impl Cookie {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path: path.unwrap_or_else(paths::default_cookie_path),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the owner pid and force the running marker (zero mtime).
    pub fn create_for(&self, pid: u32) -> Result<(), CookieError> {
        fs::write(&self.path, pid.to_string()).map_err(|e| self.io_err(e))?;
        self.set_mtime(UNIX_EPOCH)
    }

    /// Modification time, or `None` when the cookie is gone.
    pub fn mtime(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).and_then(|meta| meta.modified()).ok()
    }

    /// Seconds since the cookie was last touched.
    pub fn age(&self) -> Option<Duration> {
        SystemTime::now().duration_since(self.mtime()?).ok()
    }

    /// Create the cookie if needed and stamp it with the current time.
    pub fn touch(&self) -> Result<(), CookieError> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_err(e))?;
        self.set_mtime(SystemTime::now())
    }

    pub fn remove(&self) -> bool {
        fs::remove_file(&self.path).is_ok()
    }

    /// Pid of the owning engine, for suspend/resume signalling.
    pub fn read_pid(&self) -> Option<i32> {
        fs::read_to_string(&self.path).ok()?.trim().parse().ok()
    }

    fn set_mtime(&self, mtime: SystemTime) -> Result<(), CookieError> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_err(e))?;
        file.set_times(FileTimes::new().set_modified(mtime))
            .map_err(|e| self.io_err(e))
    }

    fn io_err(&self, source: io::Error) -> CookieError {
        CookieError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_cookie() -> (tempfile::TempDir, Cookie) {
        let dir = tempfile::tempdir().unwrap();
        let cookie = Cookie::new(Some(dir.path().join("test.cookie")));
        (dir, cookie)
    }

    #[test]
    fn create_forces_a_zero_mtime() {
        let (_dir, cookie) = temp_cookie();
        cookie.create_for(4321).unwrap();
        assert_eq!(cookie.mtime(), Some(UNIX_EPOCH));
        assert_eq!(cookie.read_pid(), Some(4321));
    }

    #[test]
    fn touch_marks_an_end_request() {
        let (_dir, cookie) = temp_cookie();
        cookie.create_for(1).unwrap();
        cookie.touch().unwrap();
        let mtime = cookie.mtime().unwrap();
        assert_ne!(mtime, UNIX_EPOCH);
        assert!(cookie.age().unwrap() < Duration::from_secs(5));
    }

    #[test]
    fn touch_creates_a_missing_cookie() {
        let (_dir, cookie) = temp_cookie();
        assert_eq!(cookie.mtime(), None);
        cookie.touch().unwrap();
        assert!(cookie.mtime().is_some());
    }

    #[test]
    fn missing_cookie_reads_as_nothing() {
        let (_dir, cookie) = temp_cookie();
        assert_eq!(cookie.mtime(), None);
        assert_eq!(cookie.age(), None);
        assert_eq!(cookie.read_pid(), None);
        assert!(!cookie.remove());
    }

    #[test]
    fn remove_reports_whether_anything_was_there() {
        let (_dir, cookie) = temp_cookie();
        cookie.create_for(1).unwrap();
        assert!(cookie.remove());
        assert!(!cookie.remove());
    }

    #[test]
    fn garbage_pid_reads_as_none() {
        let (_dir, cookie) = temp_cookie();
        fs::write(cookie.path(), "not a pid").unwrap();
        assert_eq!(cookie.read_pid(), None);
    }
}
