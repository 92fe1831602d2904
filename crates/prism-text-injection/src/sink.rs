use prism_foundation::InjectionError;

use crate::dotool::DotoolInjector;
use crate::stdout::StdoutInjector;
use crate::wtype::WtypeInjector;
use crate::xdotool::XdotoolInjector;
use crate::ydotool::YdotoolInjector;
use crate::TextSink;

/// The keystroke tools a sink can be built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulateTool {
    /// X server only.
    Xdotool,
    /// Wayland and everything else, via the uinput-based `dotool`.
    Dotool,
    /// Like `Dotool`, but relayed through the `dotoold` daemon.
    Dotoolc,
    /// Wayland, requires the `ydotoold` service.
    Ydotool,
    /// Wayland virtual keyboard protocol.
    Wtype,
    /// Bare standard output with 0x08 for backspace.
    Stdout,
}

/// Closed set of typing backends; the two `dotool` variants carry a
/// long-lived child process.
pub enum TypingSink {
    Xdotool(XdotoolInjector),
    Dotool(DotoolInjector),
    Dotoolc(DotoolInjector),
    Ydotool(YdotoolInjector),
    Wtype(WtypeInjector),
    Stdout(StdoutInjector),
}

impl TypingSink {
    pub fn new(tool: SimulateTool) -> Self {
        match tool {
            SimulateTool::Xdotool => TypingSink::Xdotool(XdotoolInjector),
            SimulateTool::Dotool => TypingSink::Dotool(DotoolInjector::new("dotool")),
            SimulateTool::Dotoolc => TypingSink::Dotoolc(DotoolInjector::new("dotoolc")),
            SimulateTool::Ydotool => TypingSink::Ydotool(YdotoolInjector),
            SimulateTool::Wtype => TypingSink::Wtype(WtypeInjector),
            SimulateTool::Stdout => TypingSink::Stdout(StdoutInjector),
        }
    }
}

impl TextSink for TypingSink {
    fn setup(&mut self) -> Result<(), InjectionError> {
        match self {
            TypingSink::Dotool(inner) | TypingSink::Dotoolc(inner) => inner.setup(),
            _ => Ok(()),
        }
    }

    fn teardown(&mut self) -> Result<(), InjectionError> {
        match self {
            TypingSink::Dotool(inner) | TypingSink::Dotoolc(inner) => inner.teardown(),
            _ => Ok(()),
        }
    }

    fn emit(&mut self, delete_prev: usize, text: &str) -> Result<(), InjectionError> {
        match self {
            TypingSink::Xdotool(inner) => inner.emit(delete_prev, text),
            TypingSink::Dotool(inner) | TypingSink::Dotoolc(inner) => {
                inner.emit(delete_prev, text)
            }
            TypingSink::Ydotool(inner) => inner.emit(delete_prev, text),
            TypingSink::Wtype(inner) => inner.emit(delete_prev, text),
            TypingSink::Stdout(inner) => inner.emit(delete_prev, text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_is_a_no_op_on_stateless_backends() {
        for tool in [SimulateTool::Xdotool, SimulateTool::Ydotool, SimulateTool::Wtype] {
            let mut sink = TypingSink::new(tool);
            assert!(sink.setup().is_ok());
            assert!(sink.teardown().is_ok());
        }
    }

    #[test]
    fn stdout_sink_accepts_empty_edits() {
        let mut sink = TypingSink::new(SimulateTool::Stdout);
        assert!(sink.setup().is_ok());
        assert!(sink.emit(0, "").is_ok());
        assert!(sink.teardown().is_ok());
    }

    #[test]
    fn dotool_emit_before_setup_is_an_error() {
        let mut sink = TypingSink::new(SimulateTool::Dotool);
        assert!(matches!(
            sink.emit(0, "hi"),
            Err(InjectionError::NotRunning { name: "dotool" })
        ));
        // Teardown without setup is harmless.
        assert!(sink.teardown().is_ok());
    }
}
