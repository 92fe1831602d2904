//! The prism-dictation application: the dictation engine, the cookie
//! control plane shared with sibling invocations, and the text
//! pipeline gluing the recognizer to a typing sink.

pub mod control;
pub mod cookie;
pub mod engine;
pub mod hook;
pub mod pipeline;
pub mod signals;
