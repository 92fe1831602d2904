//! The user's text filter.
//!
//! Users can drop an executable named `process-text` into the config
//! directory (or point `--config` at one) to rewrite dictated text:
//! the current text arrives on the filter's stdin, any arguments given
//! after `--` arrive in its argv, and whatever it prints on stdout
//! replaces the text.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use prism_foundation::{paths, HookError};

/// Where the filter comes from.
#[derive(Debug, Clone, Default)]
pub enum HookSource {
    /// The config-dir filter, when present.
    #[default]
    Default,
    /// An explicit `--config` path; missing is an error.
    Override(PathBuf),
    /// `--config ""`: never run a filter, even if one exists.
    Disabled,
}

/// Locate the filter. `Ok(None)` means "no filter configured", which
/// is the common case.
pub fn resolve(source: &HookSource, rest: &[String]) -> Result<Option<UserHook>, HookError> {
    let path = match source {
        HookSource::Disabled => return Ok(None),
        HookSource::Override(path) => {
            if !path.exists() {
                return Err(HookError::NotFound { path: path.clone() });
            }
            path.clone()
        }
        HookSource::Default => {
            let path = paths::user_config_path(paths::USER_FILTER_NAME);
            if !path.exists() {
                return Ok(None);
            }
            path
        }
    };
    Ok(Some(UserHook {
        path,
        rest: rest.to_vec(),
    }))
}

#[derive(Debug, Clone)]
pub struct UserHook {
    path: PathBuf,
    rest: Vec<String>,
}

impl UserHook {
    /// Pipe `text` through the filter and return its replacement.
    pub fn apply(&self, text: &str) -> Result<String, HookError> {
        let run_err = |reason: String| HookError::Run {
            path: self.path.clone(),
            reason,
        };

        let mut child = Command::new(&self.path)
            .args(&self.rest)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|err| run_err(err.to_string()))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .map_err(|err| run_err(err.to_string()))?;
            // Dropping the handle closes the pipe so the filter sees EOF.
        }

        let output = child
            .wait_with_output()
            .map_err(|err| run_err(err.to_string()))?;
        if !output.status.success() {
            return Err(HookError::Failed {
                path: self.path.clone(),
                status: output.status,
            });
        }

        let mut replaced = String::from_utf8(output.stdout).map_err(|_| HookError::NotText {
            path: self.path.clone(),
        })?;
        // Shell filters habitually print a trailing newline; a typed
        // newline would press Return.
        if replaced.ends_with('\n') {
            replaced.pop();
        }
        Ok(replaced.replace('\n', " "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    fn write_filter(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("process-text");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn hook_at(path: PathBuf, rest: &[&str]) -> UserHook {
        UserHook {
            path,
            rest: rest.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn filter_replaces_the_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_filter(&dir, "tr a-z A-Z");
        let hook = hook_at(path, &[]);
        assert_eq!(hook.apply("hello world").unwrap(), "HELLO WORLD");
    }

    #[test]
    fn rest_arguments_reach_the_filter() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_filter(&dir, "cat >/dev/null; printf '%s' \"$1\"");
        let hook = hook_at(path, &["replacement"]);
        assert_eq!(hook.apply("ignored").unwrap(), "replacement");
    }

    #[test]
    fn failing_filter_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_filter(&dir, "exit 3");
        let hook = hook_at(path, &[]);
        assert!(matches!(
            hook.apply("text"),
            Err(HookError::Failed { .. })
        ));
    }

    #[test]
    fn non_utf8_output_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_filter(&dir, "printf '\\377\\376'");
        let hook = hook_at(path, &[]);
        assert!(matches!(hook.apply("text"), Err(HookError::NotText { .. })));
    }

    #[test]
    fn embedded_newlines_never_survive() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_filter(&dir, "printf 'one\\ntwo\\n'");
        let hook = hook_at(path, &[]);
        assert_eq!(hook.apply("text").unwrap(), "one two");
    }

    #[test]
    fn override_must_exist() {
        let source = HookSource::Override(PathBuf::from("/nonexistent/filter"));
        assert!(matches!(
            resolve(&source, &[]),
            Err(HookError::NotFound { .. })
        ));
    }

    #[test]
    fn disabled_resolves_to_nothing() {
        assert!(resolve(&HookSource::Disabled, &[]).unwrap().is_none());
    }
}
