//! X11 injection via one `xdotool` invocation per edit.

use prism_foundation::InjectionError;

use crate::run::run_tool;

#[derive(Debug, Default)]
pub(crate) struct XdotoolInjector;

impl XdotoolInjector {
    pub fn emit(&mut self, delete_prev: usize, text: &str) -> Result<(), InjectionError> {
        if delete_prev > 0 {
            let mut args = vec!["key", "--"];
            args.extend(std::iter::repeat("BackSpace").take(delete_prev));
            run_tool("xdotool", &args)?;
        }
        run_tool("xdotool", &["type", "--clearmodifiers", "--", text])
    }
}
