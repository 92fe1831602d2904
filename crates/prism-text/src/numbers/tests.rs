use super::*;
use proptest::prelude::*;

fn tokens(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

fn rewrite(text: &str, options: &NumberOptions) -> Vec<String> {
    let mut words = tokens(text);
    rewrite_numbers(&mut words, options);
    words
}

fn rewrite_default(text: &str) -> Vec<String> {
    rewrite(text, &NumberOptions::default())
}

#[test]
fn hundred_with_connective() {
    assert_eq!(rewrite_default("one hundred and two"), ["102"]);
}

#[test]
fn repeated_pairs_split_on_segment_width() {
    assert_eq!(
        rewrite_default("twenty twenty and twenty twenty one"),
        ["2020", "and", "2021"]
    );
}

#[test]
fn bare_connective_does_not_accumulate() {
    assert_eq!(rewrite_default("three and two"), ["3", "and", "2"]);
}

#[test]
fn trailing_connective_is_left_alone() {
    assert_eq!(rewrite_default("one and"), ["1", "and"]);
}

#[test]
fn ordinals_get_their_suffix() {
    assert_eq!(rewrite_default("first"), ["1st"]);
    assert_eq!(rewrite_default("second"), ["2nd"]);
    assert_eq!(rewrite_default("third"), ["3rd"]);
    assert_eq!(rewrite_default("twenty fifth"), ["25th"]);
}

#[test]
fn plurals_get_an_apostrophe() {
    assert_eq!(rewrite_default("fifties"), ["50's"]);
}

#[test]
fn no_suffix_skips_ordinals_entirely() {
    let options = NumberOptions {
        no_suffix: true,
        ..Default::default()
    };
    assert_eq!(rewrite("first", &options), ["first"]);
    // Plain cardinals still convert.
    assert_eq!(rewrite("nine first", &options), ["9", "first"]);
}

#[test]
fn point_fuses_into_a_decimal() {
    assert_eq!(rewrite_default("two point five"), ["2.5"]);
    assert_eq!(rewrite_default("one point two point three"), ["1.2.3"]);
}

#[test]
fn arithmetic_connectives_fuse() {
    assert_eq!(rewrite_default("ten divided by two"), ["10 / 2"]);
    assert_eq!(rewrite_default("ten minus two"), ["10 - 2"]);
    assert_eq!(rewrite_default("ten plus two"), ["10 + 2"]);
    assert_eq!(rewrite_default("ten times two"), ["10 * 2"]);
    assert_eq!(rewrite_default("ten multiplied by two"), ["10 * 2"]);
    assert_eq!(rewrite_default("ten modulo two"), ["10 % 2"]);
}

#[test]
fn unrelated_words_between_numbers_do_not_fuse() {
    assert_eq!(
        rewrite_default("ten bananas not two"),
        ["10", "bananas", "not", "2"]
    );
}

#[test]
fn short_runs_group_into_one_number() {
    assert_eq!(rewrite_default("twenty twelve"), ["2012"]);
    assert_eq!(rewrite_default("one two three"), ["123"]);
}

#[test]
fn min_value_reverts_to_the_spoken_words() {
    let options = NumberOptions {
        min_value: Some(3000),
        ..Default::default()
    };
    assert_eq!(rewrite("twenty twelve", &options), ["twenty", "twelve"]);
    // At or above the threshold the digits stay.
    let options = NumberOptions {
        min_value: Some(2000),
        ..Default::default()
    };
    assert_eq!(rewrite("twenty twelve", &options), ["2012"]);
}

#[test]
fn min_value_reverts_single_words() {
    let options = NumberOptions {
        min_value: Some(10),
        ..Default::default()
    };
    assert_eq!(rewrite("no one", &options), ["no", "one"]);
    assert_eq!(rewrite("ninety", &options), ["90"]);
}

#[test]
fn separator_formats_thousands() {
    let options = NumberOptions {
        use_separator: true,
        ..Default::default()
    };
    assert_eq!(rewrite("one million", &options), ["1,000,000"]);
    assert_eq!(
        rewrite("one thousand two hundred and thirty four", &options),
        ["1,234"]
    );
}

#[test]
fn implied_single_unit_for_bare_scales() {
    assert_eq!(rewrite_default("hundred"), ["100"]);
    assert_eq!(rewrite_default("thousand"), ["1000"]);
}

#[test]
fn adjacent_scale_phrases_do_not_accumulate() {
    assert_eq!(
        rewrite_default("one hundred two hundred"),
        ["100", "200"]
    );
}

#[test]
fn follow_on_tens_fuse_but_teens_do_not() {
    assert_eq!(rewrite_default("twenty one"), ["21"]);
    // Without the follow-on rule the tens word ends its phrase; the
    // short results then regroup as recited digits.
    assert_eq!(rewrite_default("ninety fifty"), ["9050"]);
    assert_eq!(rewrite_default("one hundred ninety fifty"), ["190", "50"]);
    assert_eq!(rewrite_default("thirteen and fifty five"), ["13", "and", "55"]);
}

#[test]
fn zero_terminates_a_value() {
    assert_eq!(rewrite_default("hundred zero"), ["100", "0"]);
    assert_eq!(rewrite_default("zero zero seven"), ["007"]);
}

#[test]
fn large_phrases_use_big_accumulation() {
    assert_eq!(
        rewrite_default("two centillion"),
        [format!("2{}", "0".repeat(303))]
    );
}

#[test]
fn mixed_sentence_only_touches_number_spans() {
    assert_eq!(
        rewrite_default("i would like three hundred and twenty one apples"),
        ["i", "would", "like", "321", "apples"]
    );
}

proptest! {
    // Token lists without number words pass through untouched.
    #[test]
    fn identity_on_number_free_input(words in proptest::collection::vec("[a-z]{1,8}", 0..8)) {
        let input: Vec<String> = words
            .into_iter()
            .filter(|w| !table::table().words.contains_key(w.as_str()))
            .collect();
        let mut rewritten = input.clone();
        rewrite_numbers(&mut rewritten, &NumberOptions::default());
        prop_assert_eq!(rewritten, input);
    }

    // Rewriting is idempotent: a second pass changes nothing.
    #[test]
    fn rewriting_twice_equals_rewriting_once(
        indices in proptest::collection::vec(0usize..12, 1..6)
    ) {
        let vocab = [
            "one", "twenty", "hundred", "and", "first", "zero", "point",
            "five", "thousand", "apples", "twelve", "ninety",
        ];
        let mut words: Vec<String> =
            indices.iter().map(|&i| vocab[i].to_string()).collect();
        let options = NumberOptions::default();
        rewrite_numbers(&mut words, &options);
        let once = words.clone();
        rewrite_numbers(&mut words, &options);
        prop_assert_eq!(words, once);
    }

    // Under single-unit coercion every unit word contributes width 1,
    // so widths reflect digit structure, never magnitude.
    #[test]
    fn coerced_units_all_have_width_one(index in 0usize..6) {
        let unit = ["one", "nine", "twelve", "nineteen", "twenty", "ninety"][index];
        let words = vec![unit.to_string()];
        let parsed = parse_as_whole_value(&words, 1, 0, false, true);
        prop_assert_eq!(parsed.digits.as_str(), "1");

        // A trailing scale word still widens the coerced value.
        let words = vec![unit.to_string(), "thousand".to_string()];
        let parsed = parse_as_whole_value(&words, 2, 0, false, true);
        prop_assert_eq!(parsed.digits.as_str(), "1000");
    }
}
