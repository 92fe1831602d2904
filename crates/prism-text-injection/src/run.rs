//! One-shot tool invocation shared by the per-call backends.

use std::io;
use std::process::{Command, Stdio};

use prism_foundation::InjectionError;

/// Run a tool to completion, discarding its output.
///
/// A missing binary is the one error worth a friendly message; anything
/// else is unexpected and surfaces as-is.
pub(crate) fn run_tool(name: &'static str, args: &[&str]) -> Result<(), InjectionError> {
    let status = Command::new(name)
        .args(args)
        .stdout(Stdio::null())
        .status()
        .map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                InjectionError::ToolNotFound { name, source }
            } else {
                InjectionError::Io { name, source }
            }
        })?;

    if !status.success() {
        return Err(InjectionError::CommandFailed { name, status });
    }
    Ok(())
}
