//! Sentence-level post-processing applied to every hypothesis before it
//! reaches a typing sink.

use crate::numbers::{self, NumberOptions};

#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    /// Capitalize the first word.
    pub full_sentence: bool,
    /// Rewrite spoken number phrases into digits.
    pub numbers_as_digits: bool,
    pub numbers: NumberOptions,
}

/// Basic post-processing: mainly capitalization and number rewriting.
///
/// Newlines are always replaced with spaces first. Typed output goes
/// through key simulation, where a newline presses the return key; no
/// text is allowed to carry one.
pub fn process_text(text: &str, options: &ProcessOptions) -> String {
    let text = text.replace('\n', " ");
    let mut words: Vec<String> = text.split(' ').map(str::to_string).collect();

    if options.numbers_as_digits {
        numbers::rewrite_numbers(&mut words, &options.numbers);
    }

    if options.full_sentence {
        if let Some(first) = words.first_mut() {
            *first = capitalize(first);
        }
    }

    words.join(" ")
}

/// First character upper-cased, the rest lowered.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> ProcessOptions {
        ProcessOptions::default()
    }

    #[test]
    fn newlines_become_spaces() {
        assert_eq!(process_text("hello\nworld", &options()), "hello world");
        assert_eq!(process_text("a\n\nb", &options()), "a  b");
    }

    #[test]
    fn full_sentence_capitalizes_only_the_first_word() {
        let options = ProcessOptions {
            full_sentence: true,
            ..Default::default()
        };
        assert_eq!(process_text("hello world", &options), "Hello world");
    }

    #[test]
    fn capitalizing_a_numeric_first_token_changes_nothing() {
        let options = ProcessOptions {
            full_sentence: true,
            numbers_as_digits: true,
            ..Default::default()
        };
        assert_eq!(
            process_text("twenty twenty one hellos", &options),
            "2021 hellos"
        );
    }

    #[test]
    fn numbers_only_rewrite_when_enabled() {
        assert_eq!(process_text("twenty one", &options()), "twenty one");
        let options = ProcessOptions {
            numbers_as_digits: true,
            ..Default::default()
        };
        assert_eq!(process_text("twenty one", &options), "21");
    }

    #[test]
    fn empty_text_stays_empty() {
        assert_eq!(process_text("", &options()), "");
    }
}
