//! Rewrites spoken English number phrases into digits, in place, on a
//! token list: `twenty twenty and twenty twenty one` becomes
//! `2020 and 2021`, `one hundred and two` becomes `102`, and adjacent
//! phrases joined by arithmetic connectives fuse into expressions
//! (`two point five` → `2.5`, `ten divided by two` → `10 / 2`).
//!
//! The algorithm is two linear passes, no recursion:
//!
//! 1. For every token that can start a number phrase, bound the phrase
//!    with two independent delimiters (a segment-width scan and a
//!    left/right width comparison) and evaluate the bounded span with a
//!    single left-to-right fold.
//! 2. Concatenate runs of short numeric tokens (`20 12` → `2012`),
//!    reverting to the spoken words when a configured minimum value is
//!    not reached.

mod table;
#[cfg(test)]
mod tests;
mod value;

use table::{table, WordEntry};
use value::{below_threshold, with_separator, DecimalValue};

/// Options for [`rewrite_numbers`].
#[derive(Debug, Clone, Default)]
pub struct NumberOptions {
    /// Format plain cardinals with thousands separators.
    pub use_separator: bool,
    /// Numbers below this value are restored to their spoken words.
    pub min_value: Option<u64>,
    /// Skip phrases that would produce an ordinal or plural suffix.
    pub no_suffix: bool,
}

/// Result of evaluating one bounded number phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedNumber {
    pub digits: String,
    pub suffix: &'static str,
    /// Exclusive end of the consumed span.
    pub end: usize,
    /// False suppresses separator re-formatting of the digits.
    pub allow_reformat: bool,
}

/// Left-to-right fold of the span `[start, limit)`.
///
/// Accumulates `(current, result)`: each word multiplies `current` by
/// its scale and adds its increment, and scales above one hundred push
/// `current` into `result`. The fold remembers the last position where
/// a terminal word ended so a trailing "and" never extends the value.
///
/// With `force_single_units` every non-zero increment is coerced to 1,
/// so digit widths reflect token structure rather than magnitude; the
/// delimiter scans use this, output never does. With
/// `imply_single_unit` a standalone leading scale word evaluates to one
/// times the scale ("hundred" → 100).
fn parse_as_whole_value(
    words: &[String],
    limit: usize,
    start: usize,
    imply_single_unit: bool,
    force_single_units: bool,
) -> ParsedNumber {
    let t = table();
    let mut only_scale = imply_single_unit;

    let allow_reformat = true;

    let mut current = DecimalValue::zero();
    let mut result = DecimalValue::zero();
    let mut suffix: &'static str = "";

    // A phrase may not end on a non-terminal word; remember the last
    // good stopping point so "one and" still resolves to "1".
    let mut is_final = false;
    let mut increment_final_real: u8 = 0;
    let mut scale_final: u16 = 0;
    let mut index_final: Option<usize> = None;
    let mut fallback = ParsedNumber {
        digits: String::new(),
        suffix: "",
        end: start,
        allow_reformat,
    };

    let mut i = start;
    while i < limit {
        let word = words[i].as_str();
        let Some(&WordEntry {
            scale_pow10: scale,
            increment: increment_real,
            suffix: word_suffix,
            is_terminal,
        }) = t.words.get(word)
        else {
            break;
        };

        // An explicit "zero" starts a new value; "fifty zero" does not
        // combine the way "fifty one" does.
        if index_final.is_some() && t.zero_words.contains(word) {
            break;
        }

        suffix = word_suffix;
        is_final = is_terminal;
        let mut increment = increment_real;
        if force_single_units && increment != 0 {
            increment = 1;
        }

        if let Some(fi) = index_final {
            // Prevents "three and two" from resolving to "5", unlike
            // "three hundred and two" which resolves to "302".
            if !is_final && t.unit_words.contains(words[fi - 1].as_str()) {
                break;
            }

            // Two unit-class words of the same scale only combine under
            // the follow-on rule: "twenty one" fuses, "twenty twelve"
            // and "ninety fifty" do not.
            if scale_final == scale
                && t.unit_words.contains(word)
                && t.unit_words.contains(words[fi].as_str())
                && !(increment_final_real >= 20 && increment_real < 10)
            {
                break;
            }
        }

        if imply_single_unit && only_scale {
            if !t.scale_words.contains(word) {
                only_scale = false;
            }
            if only_scale && current.is_zero() && result.is_zero() {
                current = DecimalValue::one_shifted(scale);
                i += 1;
                break;
            }
        }

        current.shift_pow10(scale);
        current.add_small(increment);

        // Scales above one hundred close the current group.
        if scale > 2 {
            result.add_assign(&current);
            current = DecimalValue::zero();
        }

        i += 1;

        if is_final {
            fallback = ParsedNumber {
                digits: result.plus(&current).to_decimal(),
                suffix,
                end: i,
                allow_reformat,
            };
            index_final = Some(i);
            scale_final = scale;
            increment_final_real = increment_real;
        }

        // Once there is a suffix, the phrase is over.
        if !suffix.is_empty() {
            break;
        }
    }

    if !is_final {
        return fallback;
    }

    ParsedNumber {
        digits: result.plus(&current).to_decimal(),
        suffix,
        end: i,
        allow_reformat,
    }
}

/// "twenty one" style fusion: a tens word followed by a non-zero simple
/// unit.
fn allow_follow_on(prev: &str, word: &str) -> bool {
    let t = table();
    if !t.unit_words.contains(prev) || !t.unit_words.contains(word) {
        return false;
    }
    let increment_prev = t.words[prev].increment;
    let increment = t.words[word].increment;
    increment_prev >= 20 && increment < 10 && increment != 0
}

/// Delimit a phrase by scanning unit segments forward: when successive
/// segments parse (under single-unit coercion) to equal-width numbers,
/// the phrase ends at the previous segment boundary. This is what makes
/// `twenty twenty and twenty twenty one` split as `2020 and 2021`
/// instead of collapsing.
fn delimiter_from_series(words: &[String], start: usize, limit: usize) -> usize {
    let t = table();
    let mut i = start;
    let mut span_beg = start;
    let mut w_prev = "";
    let mut result_prev: Option<ParsedNumber> = None;
    let mut result_test: Option<ParsedNumber> = None;

    while i < limit {
        let w = words[i].as_str();
        if !t.words.contains_key(w) {
            break;
        }
        if i != start && allow_follow_on(words[i - 1].as_str(), w) {
            // Keep `w_prev` so "thirteen and fifty five" is not
            // delimited at the trailing "five".
        } else {
            if !w_prev.is_empty() && w_prev != "and" && t.unit_words.contains(w) {
                result_prev = result_test.take();
                let test = parse_as_whole_value(words, i, span_beg, false, true);
                // Disconnected series may consume less than the scan.
                debug_assert!(i >= test.end);
                if test.end == i {
                    if let Some(prev) = &result_prev {
                        if prev.digits.len() == test.digits.len() {
                            return prev.end;
                        }
                    }
                }
                span_beg = i;
                result_test = Some(test);
            }
            w_prev = w;
        }
        i += 1;
    }

    let result_prev = result_test;
    let test = parse_as_whole_value(words, i, span_beg, false, true);
    if let Some(prev) = &result_prev {
        if prev.digits.len() == test.digits.len() {
            return prev.end;
        }
    }

    limit
}

/// Delimit a phrase by trying every internal split: if the right half
/// parses at least as wide as the left half, split there. Prevents
/// "one hundred two hundred" from accumulating into "300".
fn delimiter_from_slide(words: &[String], start: usize, limit: usize) -> usize {
    let t = table();
    let mut i = start;
    let mut w_prev = "";

    while i < limit {
        let w = words[i].as_str();
        if !t.words.contains_key(w) {
            break;
        }
        if i != start && allow_follow_on(words[i - 1].as_str(), w) {
            // As above: follow-on words never delimit.
        } else {
            if !w_prev.is_empty() && w_prev != "and" && t.unit_words.contains(w) {
                let lhs = parse_as_whole_value(words, i, start, false, true);
                let rhs = parse_as_whole_value(words, limit, i, false, true);
                if lhs.digits.len() <= rhs.digits.len() {
                    return lhs.end;
                }
            }
            w_prev = w;
        }
        i += 1;
    }

    limit
}

/// Parse one number phrase starting at `start`, taking the tighter of
/// the two delimiters before evaluating.
pub(crate) fn parse_number(
    words: &[String],
    start: usize,
    imply_single_unit: bool,
) -> ParsedNumber {
    let mut limit = words.len();
    limit = delimiter_from_series(words, start, limit);
    limit = delimiter_from_slide(words, start, limit);
    parse_as_whole_value(words, limit, start, imply_single_unit, false)
}

/// Arithmetic connective between two rewritten numbers.
fn fuse_connective(between: &[String], lhs: &str, rhs: &str) -> Option<String> {
    let between: Vec<&str> = between.iter().map(String::as_str).collect();
    let joined = match between.as_slice() {
        ["point"] => format!("{lhs}.{rhs}"),
        ["minus"] => format!("{lhs} - {rhs}"),
        ["plus"] => format!("{lhs} + {rhs}"),
        ["divided", "by"] => format!("{lhs} / {rhs}"),
        ["multiplied", "by"] | ["times"] => format!("{lhs} * {rhs}"),
        ["modulo"] => format!("{lhs} % {rhs}"),
        _ => return None,
    };
    Some(joined)
}

fn is_short_digits(token: &str) -> bool {
    !token.is_empty() && token.len() <= 2 && token.bytes().all(|b| b.is_ascii_digit())
}

/// Rewrite every number phrase in `words` in place.
///
/// Each token keeps a record of the spoken words it came from so the
/// minimum-value filter can restore them exactly.
pub fn rewrite_numbers(words: &mut Vec<String>, options: &NumberOptions) {
    let t = table();
    let mut origin: Vec<Vec<String>> = words.iter().map(|w| vec![w.clone()]).collect();

    let mut i = 0;
    let mut i_number_prev: Option<usize> = None;
    while i < words.len() {
        if t.digit_words.contains(words[i].as_str()) {
            let parsed = parse_number(words, i, true);
            if parsed.end != i {
                if options.no_suffix && !parsed.suffix.is_empty() {
                    i += 1;
                    continue;
                }

                let formatted = if options.use_separator && parsed.allow_reformat {
                    with_separator(&parsed.digits)
                } else {
                    parsed.digits.clone()
                };
                let end = parsed.end;
                words.splice(i..end, [format!("{}{}", formatted, parsed.suffix)]);
                collapse_origin(&mut origin, i, end);

                if let Some(prev) = i_number_prev {
                    if prev + 1 != i {
                        if let Some(fused) =
                            fuse_connective(&words[prev + 1..i], &words[prev], &words[i])
                        {
                            words.splice(prev..i + 1, [fused]);
                            collapse_origin(&mut origin, prev, i + 1);
                            i = prev;
                        }
                    }
                }

                i_number_prev = Some(i);
            }
        }
        i += 1;
    }

    // Group runs of short numbers: reciting single digits or pairs is
    // common for years and phone numbers ("twenty twenty" → "2020").
    let mut i = 0;
    while i < words.len() {
        if !is_short_digits(&words[i]) {
            i += 1;
            continue;
        }
        let mut j = i + 1;
        while j < words.len() && is_short_digits(&words[j]) {
            j += 1;
        }
        if j != i + 1 {
            let joined = words[i..j].concat();
            words.splice(i..j, [joined]);
            collapse_origin(&mut origin, i, j);
        }
        if let Some(min_value) = options.min_value {
            if below_threshold(&words[i], min_value) {
                let restored = origin[i].clone();
                let restored_len = restored.len();
                words.splice(i..i + 1, restored.iter().cloned());
                origin.splice(i..i + 1, restored.into_iter().map(|w| vec![w]));
                i += restored_len;
                continue;
            }
        }
        i += 1;
    }
}

/// Merge the provenance of `range` into one slot after a token splice.
fn collapse_origin(origin: &mut Vec<Vec<String>>, start: usize, end: usize) {
    let merged: Vec<String> = origin[start..end].iter().flatten().cloned().collect();
    origin.splice(start..end, [merged]);
}
