//! Fuzz target for expiry date validation.
//!
//! Tests that date checks never panic and only accept 20YY years with
//! months 01-12.

#![no_main]

use cardcheck::expiry;
use chrono::NaiveDate;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (&str, &str)| {
    let (year, month) = input;
    let _ = expiry::valid_date(year, month);

    let epoch = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
    if expiry::valid_date_at(year, month, epoch) {
        assert_eq!(year.len(), 4);
        assert!(year.starts_with("20"));
        let month: u32 = month.parse().unwrap();
        assert!((1..=12).contains(&month));
    }
});
