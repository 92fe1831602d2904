//! The number-word dictionary.
//!
//! Every word maps to `(scale power, increment, suffix, terminal)`:
//! units carry an increment and no scale, scale words carry a power of
//! ten and no increment, and the connective "and" is the one
//! non-terminal entry (it may join a phrase but cannot end one).
//! Pluralized ("fifties") and ordinal ("fiftieth") forms share the
//! numeric data of their cardinal and add a rendering suffix.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

#[derive(Debug, Clone, Copy)]
pub(crate) struct WordEntry {
    /// Power of ten this word multiplies by; 0 for unit and tens words.
    pub scale_pow10: u16,
    pub increment: u8,
    pub suffix: &'static str,
    /// False only for the connective "and".
    pub is_terminal: bool,
}

pub(crate) struct WordTable {
    pub words: HashMap<&'static str, WordEntry>,
    /// Words that may start a numeric phrase (everything except "and").
    pub digit_words: HashSet<&'static str>,
    pub unit_words: HashSet<&'static str>,
    pub scale_words: HashSet<&'static str>,
    pub zero_words: HashSet<&'static str>,
}

type Forms = [(&'static str, &'static str); 3];

/// Cardinal, plural and ordinal forms for 0..=19.
const UNITS: [Forms; 20] = [
    [("zero", ""), ("zeroes", "'s"), ("zeroth", "th")],
    [("one", ""), ("ones", "'s"), ("first", "st")],
    [("two", ""), ("twos", "'s"), ("second", "nd")],
    [("three", ""), ("threes", "'s"), ("third", "rd")],
    [("four", ""), ("fours", "'s"), ("fourth", "th")],
    [("five", ""), ("fives", "'s"), ("fifth", "th")],
    [("six", ""), ("sixes", "'s"), ("sixth", "th")],
    [("seven", ""), ("sevens", "'s"), ("seventh", "th")],
    [("eight", ""), ("eights", "'s"), ("eighth", "th")],
    [("nine", ""), ("nines", "'s"), ("ninth", "th")],
    [("ten", ""), ("tens", "'s"), ("tenth", "th")],
    [("eleven", ""), ("elevens", "'s"), ("eleventh", "th")],
    [("twelve", ""), ("twelves", "'s"), ("twelfth", "th")],
    [("thirteen", ""), ("thirteens", "'s"), ("thirteenth", "th")],
    [("fourteen", ""), ("fourteens", "'s"), ("fourteenth", "th")],
    [("fifteen", ""), ("fifteens", "'s"), ("fifteenth", "th")],
    [("sixteen", ""), ("sixteens", "'s"), ("sixteenth", "th")],
    [("seventeen", ""), ("seventeens", "'s"), ("seventeenth", "th")],
    [("eighteen", ""), ("eighteens", "'s"), ("eighteenth", "th")],
    [("nineteen", ""), ("nineteens", "'s"), ("nineteenth", "th")],
];

/// Tens words, indexed by tens digit (0 and 1 have no dedicated word).
const TENS: [Forms; 10] = [
    [("", ""), ("", ""), ("", "")],
    [("", ""), ("", ""), ("", "")],
    [("twenty", ""), ("twenties", "'s"), ("twentieth", "th")],
    [("thirty", ""), ("thirties", "'s"), ("thirtieth", "th")],
    [("forty", ""), ("forties", "'s"), ("fortieth", "th")],
    [("fifty", ""), ("fifties", "'s"), ("fiftieth", "th")],
    [("sixty", ""), ("sixties", "'s"), ("sixtieth", "th")],
    [("seventy", ""), ("seventies", "'s"), ("seventieth", "th")],
    [("eighty", ""), ("eighties", "'s"), ("eightieth", "th")],
    [("ninety", ""), ("nineties", "'s"), ("ninetieth", "th")],
];

const SCALES: [(Forms, u16); 23] = [
    ([("hundred", ""), ("hundreds", "s"), ("hundredth", "th")], 2),
    ([("thousand", ""), ("thousands", "s"), ("thousandth", "th")], 3),
    ([("million", ""), ("millions", "s"), ("millionth", "th")], 6),
    ([("billion", ""), ("billions", "s"), ("billionth", "th")], 9),
    ([("trillion", ""), ("trillions", "s"), ("trillionth", "th")], 12),
    (
        [
            ("quadrillion", ""),
            ("quadrillions", "s"),
            ("quadrillionth", "th"),
        ],
        15,
    ),
    (
        [
            ("quintillion", ""),
            ("quintillions", "s"),
            ("quintillionth", "th"),
        ],
        18,
    ),
    (
        [
            ("sextillion", ""),
            ("sextillions", "s"),
            ("sextillionth", "th"),
        ],
        21,
    ),
    (
        [
            ("septillion", ""),
            ("septillions", "s"),
            ("septillionth", "th"),
        ],
        24,
    ),
    (
        [
            ("octillion", ""),
            ("octillions", "s"),
            ("octillionth", "th"),
        ],
        27,
    ),
    (
        [
            ("nonillion", ""),
            ("nonillions", "s"),
            ("nonillionth", "th"),
        ],
        30,
    ),
    (
        [
            ("decillion", ""),
            ("decillions", "s"),
            ("decillionth", "th"),
        ],
        33,
    ),
    (
        [
            ("undecillion", ""),
            ("undecillions", "s"),
            ("undecillionth", "th"),
        ],
        36,
    ),
    (
        [
            ("duodecillion", ""),
            ("duodecillions", "s"),
            ("duodecillionth", "th"),
        ],
        39,
    ),
    (
        [
            ("tredecillion", ""),
            ("tredecillions", "s"),
            ("tredecillionth", "th"),
        ],
        42,
    ),
    (
        [
            ("quattuordecillion", ""),
            ("quattuordecillions", "s"),
            ("quattuordecillionth", "th"),
        ],
        45,
    ),
    (
        [
            ("quindecillion", ""),
            ("quindecillions", "s"),
            ("quindecillionth", "th"),
        ],
        48,
    ),
    (
        [
            ("sexdecillion", ""),
            ("sexdecillions", "s"),
            ("sexdecillionth", "th"),
        ],
        51,
    ),
    (
        [
            ("septendecillion", ""),
            ("septendecillions", "s"),
            ("septendecillionth", "th"),
        ],
        54,
    ),
    (
        [
            ("octodecillion", ""),
            ("octodecillions", "s"),
            ("octodecillionth", "th"),
        ],
        57,
    ),
    (
        [
            ("novemdecillion", ""),
            ("novemdecillions", "s"),
            ("novemdecillionth", "th"),
        ],
        60,
    ),
    (
        [
            ("vigintillion", ""),
            ("vigintillions", "s"),
            ("vigintillionth", "th"),
        ],
        63,
    ),
    (
        [
            ("centillion", ""),
            ("centillions", "s"),
            ("centillionth", "th"),
        ],
        303,
    ),
];

fn build_table() -> WordTable {
    let mut words = HashMap::new();
    let mut unit_words = HashSet::new();
    let mut scale_words = HashSet::new();

    // The connective; joins phrases but cannot terminate one.
    words.insert(
        "and",
        WordEntry {
            scale_pow10: 0,
            increment: 0,
            suffix: "",
            is_terminal: false,
        },
    );

    for (increment, forms) in UNITS.iter().enumerate() {
        for &(word, suffix) in forms {
            words.insert(
                word,
                WordEntry {
                    scale_pow10: 0,
                    increment: increment as u8,
                    suffix,
                    is_terminal: true,
                },
            );
            unit_words.insert(word);
        }
    }
    for (tens, forms) in TENS.iter().enumerate() {
        for &(word, suffix) in forms {
            if word.is_empty() {
                continue;
            }
            words.insert(
                word,
                WordEntry {
                    scale_pow10: 0,
                    increment: (tens * 10) as u8,
                    suffix,
                    is_terminal: true,
                },
            );
            unit_words.insert(word);
        }
    }
    for (forms, power) in &SCALES {
        for &(word, suffix) in forms {
            words.insert(
                word,
                WordEntry {
                    scale_pow10: *power,
                    increment: 0,
                    suffix,
                    is_terminal: true,
                },
            );
            scale_words.insert(word);
        }
    }

    let zero_words = UNITS[0].iter().map(|&(word, _)| word).collect();
    let mut digit_words: HashSet<&'static str> = words.keys().copied().collect();
    digit_words.remove("and");

    WordTable {
        words,
        digit_words,
        unit_words,
        scale_words,
        zero_words,
    }
}

static TABLE: Lazy<WordTable> = Lazy::new(build_table);

pub(crate) fn table() -> &'static WordTable {
    &TABLE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connective_is_not_terminal() {
        let entry = table().words["and"];
        assert!(!entry.is_terminal);
        assert_eq!(entry.increment, 0);
        assert_eq!(entry.scale_pow10, 0);
        assert!(!table().digit_words.contains("and"));
    }

    #[test]
    fn ordinals_share_numeric_data_with_cardinals() {
        let first = table().words["first"];
        assert_eq!(first.increment, 1);
        assert_eq!(first.suffix, "st");
        let fiftieth = table().words["fiftieth"];
        assert_eq!(fiftieth.increment, 50);
        assert_eq!(fiftieth.suffix, "th");
        let hundredth = table().words["hundredth"];
        assert_eq!(hundredth.scale_pow10, 2);
        assert_eq!(hundredth.suffix, "th");
    }

    #[test]
    fn scale_words_cover_hundred_to_centillion() {
        assert_eq!(table().words["hundred"].scale_pow10, 2);
        assert_eq!(table().words["thousand"].scale_pow10, 3);
        assert_eq!(table().words["centillion"].scale_pow10, 303);
        assert!(table().scale_words.contains("vigintillion"));
        assert!(!table().scale_words.contains("ninety"));
    }

    #[test]
    fn zero_forms_are_tracked() {
        for word in ["zero", "zeroes", "zeroth"] {
            assert!(table().zero_words.contains(word));
        }
        assert!(!table().zero_words.contains("one"));
    }
}
