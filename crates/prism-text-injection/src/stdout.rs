//! Plain standard-output "typing": backspaces become 0x08.
//!
//! Diagnostics go to stderr throughout the workspace, so stdout stays
//! clean for consumers of this backend.

use std::io::{self, Write};

use prism_foundation::InjectionError;

#[derive(Debug, Default)]
pub(crate) struct StdoutInjector;

impl StdoutInjector {
    pub fn emit(&mut self, delete_prev: usize, text: &str) -> Result<(), InjectionError> {
        let mut out = io::stdout().lock();
        let io_err = |source| InjectionError::Io {
            name: "stdout",
            source,
        };
        if delete_prev > 0 {
            out.write_all("\u{8}".repeat(delete_prev).as_bytes())
                .map_err(io_err)?;
        }
        out.write_all(text.as_bytes()).map_err(io_err)?;
        out.flush().map_err(io_err)
    }
}
