//! Fuzz target for card validation.
//!
//! Tests that validation never panics and that rejected numbers carry no
//! number or type.

#![no_main]

use arbitrary::Arbitrary;
use cardcheck::{clean_number, is_valid, validate_card, CardValidator, TypeHint};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    number: &'a str,
    hints: Vec<&'a str>,
}

fuzz_target!(|input: Input<'_>| {
    let validator = CardValidator::new();

    let result = validate_card(input.number);
    assert_eq!(result.valid, is_valid(input.number));
    if result.valid {
        assert_eq!(result.number, clean_number(input.number));
        assert!(!result.card_type.is_empty());
    } else {
        assert!(result.number.is_empty());
        assert!(result.card_type.is_empty());
    }

    let _ = validator.detect_type(input.number);
    let _ = validator.check_card(input.number, TypeHint::Detect);

    let hinted = validator.validate_card_with(input.number, input.hints.clone());
    if hinted.valid && !input.hints.is_empty() {
        assert!(input.hints.contains(&hinted.card_type.as_str()));
    }
});
