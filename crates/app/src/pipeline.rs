//! Everything between a raw hypothesis and the typing sink: built-in
//! post-processing, the user filter, and run-on punctuation.

use tracing::warn;

use prism_foundation::HookError;
use prism_text::{process_text, ProcessOptions};

use crate::hook::{self, HookSource, UserHook};

pub struct TextPipeline {
    options: ProcessOptions,
    source: HookSource,
    rest: Vec<String>,
    hook: Option<UserHook>,
    /// Continue the previous session's sentence with punctuation.
    run_on: bool,
    loaded: bool,
}

impl TextPipeline {
    pub fn new(
        options: ProcessOptions,
        source: HookSource,
        rest: Vec<String>,
        run_on: bool,
    ) -> Self {
        Self {
            options,
            source,
            rest,
            hook: None,
            run_on,
            loaded: false,
        }
    }

    /// Process one hypothesis into typed text.
    ///
    /// The user filter is resolved lazily on first use so recording can
    /// start before any configuration I/O; a broken configuration at
    /// this point is fatal.
    pub fn process(&mut self, text: &str) -> Result<String, HookError> {
        if !self.loaded {
            self.hook = hook::resolve(&self.source, &self.rest)?;
            self.loaded = true;
        }
        if text.is_empty() {
            return Ok(String::new());
        }

        let mut out = process_text(text, &self.options);
        if let Some(user_hook) = &self.hook {
            out = user_hook.apply(&out)?;
        }
        if self.run_on {
            // The previous session ended moments ago; carry its
            // sentence on instead of starting cold.
            out = if self.options.full_sentence {
                format!(". {out}")
            } else {
                format!(", {out}")
            };
        }
        Ok(out)
    }

    /// Re-resolve the user filter (SIGHUP). A failure here keeps the
    /// previous filter instead of killing a live session.
    pub fn reload(&mut self) {
        match hook::resolve(&self.source, &self.rest) {
            Ok(user_hook) => self.hook = user_hook,
            Err(err) => warn!(%err, "Reload failed, continuing with previous configuration."),
        }
        self.loaded = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_text::NumberOptions;

    fn plain_pipeline(options: ProcessOptions, run_on: bool) -> TextPipeline {
        TextPipeline::new(options, HookSource::Disabled, Vec::new(), run_on)
    }

    #[test]
    fn empty_input_stays_empty_even_with_run_on() {
        let mut pipeline = plain_pipeline(ProcessOptions::default(), true);
        assert_eq!(pipeline.process("").unwrap(), "");
    }

    #[test]
    fn run_on_prefixes_a_comma() {
        let mut pipeline = plain_pipeline(ProcessOptions::default(), true);
        assert_eq!(pipeline.process("continuing").unwrap(), ", continuing");
    }

    #[test]
    fn run_on_with_full_sentence_prefixes_a_stop() {
        let options = ProcessOptions {
            full_sentence: true,
            ..Default::default()
        };
        let mut pipeline = plain_pipeline(options, true);
        assert_eq!(pipeline.process("continuing").unwrap(), ". Continuing");
    }

    #[test]
    fn numbers_flow_through() {
        let options = ProcessOptions {
            numbers_as_digits: true,
            numbers: NumberOptions::default(),
            ..Default::default()
        };
        let mut pipeline = plain_pipeline(options, false);
        assert_eq!(
            pipeline.process("twenty twenty one hellos").unwrap(),
            "2021 hellos"
        );
    }

    #[test]
    fn missing_override_fails_on_first_use() {
        let mut pipeline = TextPipeline::new(
            ProcessOptions::default(),
            HookSource::Override("/nonexistent/filter".into()),
            Vec::new(),
            false,
        );
        assert!(pipeline.process("text").is_err());
    }

    #[test]
    fn reload_keeps_the_previous_hook_on_failure() {
        let mut pipeline = TextPipeline::new(
            ProcessOptions::default(),
            HookSource::Override("/nonexistent/filter".into()),
            Vec::new(),
            false,
        );
        // Simulates a SIGHUP arriving with a broken configuration: the
        // reload warns, the pipeline keeps working without a hook.
        pipeline.reload();
        assert_eq!(pipeline.process("still fine").unwrap(), "still fine");
    }
}
