//! Property-based invariant tests for field rules.
//!
//! 1. Every builtin except `Required` accepts the empty string.
//! 2. `Required` fails exactly on blank input.
//! 3. An `All` list reports the first failing rule, in insertion order.
//! 4. `Pattern` matches the whole value, never a substring.

use proptest::prelude::*;
use recform_validation::{
    All, ExactLength, Integer, MinLength, Numeric, OneOf, Pattern, Positive, Required,
    ValidationResult, Validator,
};

fn optional_rules() -> Vec<Box<dyn Validator<str>>> {
    vec![
        Box::new(MinLength::new(3)),
        Box::new(ExactLength::new(3)),
        Box::new(Pattern::new(r"\d{3}").expect("valid pattern")),
        Box::new(Numeric::new()),
        Box::new(Positive::new()),
        Box::new(Integer::new()),
        Box::new(OneOf::new(["a", "b"])),
    ]
}

fn first_failure(rules: &[Box<dyn Validator<str>>], value: &str) -> ValidationResult {
    for rule in rules {
        let result = rule.validate(value);
        if result.is_invalid() {
            return result;
        }
    }
    ValidationResult::Valid
}

// ── 1. Empty is valid for optional rules ────────────────────────────────

#[test]
fn optional_rules_accept_empty() {
    for (i, rule) in optional_rules().iter().enumerate() {
        assert!(rule.validate("").is_valid(), "rule #{i}");
    }
}

// ── 2. Required ─────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn required_fails_only_on_blank(value in "[ \t]{0,4}|[ a-z0-9]{0,12}") {
        let blank = value.trim().is_empty();
        prop_assert_eq!(Required::new().validate(value.as_str()).is_invalid(), blank);
    }
}

// ── 3. First failure wins ───────────────────────────────────────────────

proptest! {
    #[test]
    fn all_matches_manual_first_failure(
        order in Just((0..7usize).collect::<Vec<_>>()).prop_shuffle(),
        value in "[0-9a-z.-]{0,6}",
    ) {
        let mut pool: Vec<Option<Box<dyn Validator<str>>>> =
            optional_rules().into_iter().map(Some).collect();
        let picked: Vec<Box<dyn Validator<str>>> =
            order.into_iter().filter_map(|i| pool[i].take()).collect();
        let expected = first_failure(&picked, &value);
        let all = All::new(picked);
        prop_assert_eq!(all.validate(value.as_str()), expected);
    }
}

// ── 4. Full match ───────────────────────────────────────────────────────

proptest! {
    #[test]
    fn pattern_is_full_match(value in "[0-9]{0,6}") {
        let three = Pattern::new(r"\d{3}").expect("valid pattern");
        let expected = value.is_empty() || value.chars().count() == 3;
        prop_assert_eq!(three.validate(value.as_str()).is_valid(), expected);
    }
}
