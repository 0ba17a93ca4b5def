//! Fuzz target for CVC validation.
//!
//! Tests that CVC checks never panic for any code or type.

#![no_main]

use cardcheck::{types, CardValidator};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (&str, &str)| {
    let (cvc, card_type) = input;
    let validator = CardValidator::new();

    let _ = validator.check_cvc(cvc, card_type);

    for card_type in validator.registry().types() {
        if validator.valid_cvc(cvc, card_type) {
            assert!(cvc.bytes().all(|b| b.is_ascii_digit()));
            assert!(cvc.len() == 3 || (card_type == types::AMEX && cvc.len() == 4));
        }
    }
});
