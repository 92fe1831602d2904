//! Wayland injection via one `ydotool` invocation per edit.

use prism_foundation::InjectionError;

use crate::run::run_tool;

#[derive(Debug, Default)]
pub(crate) struct YdotoolInjector;

impl YdotoolInjector {
    pub fn emit(&mut self, delete_prev: usize, text: &str) -> Result<(), InjectionError> {
        if delete_prev > 0 {
            // ydotool's key subcommand takes linux keycodes with a key
            // state: 14 is backspace, :1 pressed, :0 released. The key
            // delay is lower than the type delay because it applies to
            // each state change.
            let mut args = vec!["key", "--key-delay", "3", "--"];
            for _ in 0..delete_prev {
                args.push("14:1");
                args.push("14:0");
            }
            run_tool("ydotool", &args)?;
        }
        // A low next-delay keeps typing snappy compared to the slow
        // default.
        run_tool("ydotool", &["type", "--next-delay", "5", "--", text])
    }
}
