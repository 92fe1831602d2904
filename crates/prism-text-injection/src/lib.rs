//! Keystroke injection for prism-dictation.
//!
//! All backends speak the same small contract: delete a number of
//! characters from the end of what was previously typed, then append
//! replacement text. Four backends shell out per call (`xdotool`,
//! `wtype`, `ydotool`) or write to stdout; the `dotool` family keeps a
//! long-lived child process and feeds it command lines over stdin,
//! which is why the contract also has explicit `setup`/`teardown`
//! lifecycle points.

mod dotool;
mod run;
mod sink;
mod stdout;
mod wtype;
mod xdotool;
mod ydotool;

pub use prism_foundation::InjectionError;
pub use sink::{SimulateTool, TypingSink};

/// A destination for dictated text.
///
/// `emit(delete_prev, text)` removes `delete_prev` characters from the
/// end of previously typed output, then types `text`. `setup` must be
/// called before the first emission of a session and `teardown` on
/// every suspend and on exit; backends without persistent state accept
/// both as no-ops.
pub trait TextSink {
    fn setup(&mut self) -> Result<(), InjectionError>;
    fn teardown(&mut self) -> Result<(), InjectionError>;
    fn emit(&mut self, delete_prev: usize, text: &str) -> Result<(), InjectionError>;
}
