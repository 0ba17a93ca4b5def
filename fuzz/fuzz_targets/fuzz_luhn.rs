//! Fuzz target for the Luhn algorithm.
//!
//! Tests that luhn functions never panic and maintain invariants.

#![no_main]

use cardcheck::luhn;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Clamp values to valid digit range
    let digits: Vec<u8> = data.iter().map(|&b| b % 10).collect();

    // String form must agree with the digit form
    let text: String = digits.iter().map(|d| char::from(b'0' + d)).collect();
    assert_eq!(luhn::is_valid(&text), luhn::validate(&digits));

    // Raw bytes as a string never panic
    if let Ok(raw) = std::str::from_utf8(data) {
        let _ = luhn::is_valid(raw);
    }

    if digits.is_empty() {
        assert!(!luhn::validate(&digits));
        return;
    }

    assert_eq!(luhn::validate(&digits), luhn::checksum(&digits) % 10 == 0);

    if digits.len() <= 18 {
        let check = luhn::generate_check_digit(&digits);
        assert!(check <= 9, "Check digit should be 0-9");

        let mut with_check = digits.clone();
        with_check.push(check);
        assert!(luhn::validate(&with_check), "Adding check digit should make valid");
    }
});
