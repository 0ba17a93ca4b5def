//! Card expiry date validation.
//!
//! An expiry date is given as a separate year and month, each as anything
//! that implements [`Display`] (so `"2030"`, `2030`, `"7"`, `"07"` and `7`
//! are all accepted). The month is left-padded with `0` to two characters.
//!
//! A date is valid when
//!
//! - the year is exactly `20` followed by two digits,
//! - the month is `01` through `12`,
//! - and the (year, month) pair is not before the current month.
//!
//! A card stays valid through its whole expiry month.
//!
//! # Example
//!
//! ```
//! use cardcheck::expiry::{check_date_at, valid_date_at};
//! use cardcheck::DateError;
//! use chrono::NaiveDate;
//!
//! let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
//!
//! assert!(valid_date_at("2026", "10", today));
//! assert!(valid_date_at(2030, 1, today));
//! assert!(!valid_date_at("2026", "09", today));
//!
//! assert_eq!(
//!     check_date_at("2026", "9", today),
//!     Err(DateError::Expired { year: 2026, month: 9 })
//! );
//! ```

use crate::error::DateError;
use chrono::{Datelike, Local};
use std::fmt::Display;

/// Returns true if the expiry date has not passed, in local time.
pub fn valid_date(year: impl Display, month: impl Display) -> bool {
    check_date(year, month).is_ok()
}

/// Returns true if the expiry date has not passed as of `today`.
pub fn valid_date_at(year: impl Display, month: impl Display, today: impl Datelike) -> bool {
    check_date_at(year, month, today).is_ok()
}

/// Validates an expiry date against the current local date.
pub fn check_date(year: impl Display, month: impl Display) -> Result<(), DateError> {
    check_date_at(year, month, Local::now().date_naive())
}

/// Validates an expiry date against `today`, returning the reason on failure.
pub fn check_date_at(
    year: impl Display,
    month: impl Display,
    today: impl Datelike,
) -> Result<(), DateError> {
    let year = parse_year(&year.to_string())?;
    let month = parse_month(&month.to_string())?;

    if (year, month) < (today.year(), today.month()) {
        return Err(DateError::Expired { year, month });
    }

    Ok(())
}

fn parse_year(year: &str) -> Result<i32, DateError> {
    let invalid = || DateError::InvalidYear(year.to_string());

    match year.as_bytes() {
        [b'2', b'0', yy @ ..] if yy.len() == 2 && yy.iter().all(u8::is_ascii_digit) => {
            year.parse().map_err(|_| invalid())
        }
        _ => Err(invalid()),
    }
}

fn parse_month(month: &str) -> Result<u32, DateError> {
    let padded = format!("{:0>2}", month);
    let invalid = || DateError::InvalidMonth(padded.clone());

    if padded.len() != 2 || !padded.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    match padded.parse() {
        Ok(m @ 1..=12) => Ok(m),
        _ => Err(invalid()),
    }
}
