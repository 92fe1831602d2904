//! Pure text transforms: sentence post-processing and the
//! words-to-digits number parser.
//!
//! Nothing in this crate touches the outside world; both passes operate
//! on plain token lists and are deterministic.

pub mod numbers;
pub mod process;

pub use numbers::NumberOptions;
pub use process::{process_text, ProcessOptions};
