//! # cardcheck
//!
//! Offline payment card validation for checkout and payment-form backends.
//!
//! ## Features
//!
//! - Card type detection from an ordered, configurable rule registry
//! - BIN cache lookups that take precedence over the static patterns
//! - Luhn checksum validation and check-digit generation
//! - CVC and expiry date validation
//! - JSON rule and BIN cache loading (`json` feature)
//!
//! ## Quick Start
//!
//! ```rust
//! use cardcheck::{is_valid, validate_card, CardValidator};
//!
//! let result = validate_card("4242-4242-4242-4242");
//! assert!(result.valid);
//! assert_eq!(result.number, "4242424242424242");
//! assert_eq!(result.card_type, "visa");
//!
//! // Safe for logging
//! println!("{:?}", result); // number: "************4242"
//!
//! assert!(is_valid("378282246310005"));
//! assert!(!is_valid("4242424242424241"));
//!
//! // Restrict to a set of accepted types
//! let validator = CardValidator::new();
//! assert!(validator.validate_card_with("4242424242424242", ["mastercard", "visa"]).valid);
//! assert!(!validator.validate_card_with("4242424242424242", ["mastercard", "amex"]).valid);
//! ```
//!
//! ## Custom Types and BIN Cache
//!
//! ```rust
//! use cardcheck::{CardValidator, MemoryBinCache, RuleConfig};
//!
//! let cache = MemoryBinCache::from_entries([("123456", "testCard"), ("456789", "testCard")]).unwrap();
//! let rules = [RuleConfig::new("testCard", "^(123456|456789)", [16]).luhn(false)];
//! let validator = CardValidator::from_config(cache, &rules).unwrap();
//!
//! // 456789 would otherwise be a Visa BIN
//! assert_eq!(validator.validate_card("4567891234567891").card_type, "testCard");
//! ```
//!
//! ## CVC and Expiry
//!
//! ```rust
//! use cardcheck::{valid_cvc, valid_date};
//!
//! assert!(valid_cvc("123", "visa"));
//! assert!(valid_cvc("1234", "amex"));
//! assert!(!valid_cvc("1234", "visa"));
//!
//! assert!(valid_date(2099, 12));
//! assert!(!valid_date("2020", "01"));
//! assert!(!valid_date("j201", "d4"));
//! ```
//!
//! ## Supported Card Types
//!
//! Rules are tried in this order; the first matching pattern wins.
//!
//! | Type | Prefix | Length | CVC | Luhn |
//! |------|--------|--------|-----|------|
//! | `visaelectron` | 4026, 417500, 4405, 4508, 4844, 4913, 4917 | 16 | 3 | yes |
//! | `maestro` | 5018, 502, 503, 56, 58, 6304, 639, 67 | 12-19 | 3 | yes |
//! | `forbrugsforeningen` | 600 | 16 | 3 | yes |
//! | `dankort` | 5019 | 16 | 3 | yes |
//! | `elo` | issuer BIN list | 16 | 3 | yes |
//! | `hipercard` | 384100, 606282, 637095, ... | 14-19 | 3 | yes |
//! | `visa` | 4 | 13, 16, 19 | 3 | yes |
//! | `mastercard` | 50-55, 2221-2720 | 16 | 3 | yes |
//! | `amex` | 34, 37 | 15 | 3, 4 | yes |
//! | `dinersclub` | 30, 36, 38, 39 | 14 | 3 | yes |
//! | `discover` | 60, 64, 65, 622 | 16 | 3 | yes |
//! | `unionpay` | 62, 88 | 16-19 | 3 | no |
//! | `jcb` | 35 | 16 | 3 | yes |
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `json` | JSON rule and BIN cache loaders, `Serialize` for results |
//! | `parallel` | Rayon-based batch validation |
//! | `cli` | `cardcheck` command-line tool |
//! | `full` | All of the above |
//!
//! ## Security
//!
//! - Card numbers and CVCs are never logged; only BIN keys and type ids
//! - `Debug` on [`ValidationResult`] shows the masked number
//! - The number in a [`ValidationResult`] is zeroed on drop
//! - No unsafe code (`#![deny(unsafe_code)]`)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod batch;
pub mod cache;
pub mod cvc;
pub mod detect;
pub mod error;
pub mod expiry;
pub mod luhn;
pub mod registry;
pub mod result;
pub mod rule;
pub mod validate;

use std::sync::OnceLock;

// Re-export main types at crate root
pub use cache::{BinCache, MemoryBinCache, BIN_CACHE_KEY_LEN};
pub use error::{BinCacheError, CvcError, DateError, RuleError, ValidationError};
pub use expiry::valid_date;
pub use registry::{Registry, RegistryBuilder};
pub use result::ValidationResult;
pub use rule::{types, CardTypeRule, RuleConfig};
pub use validate::{clean_number, CardValidator, TypeHint};

fn default_validator() -> &'static CardValidator {
    static DEFAULT: OnceLock<CardValidator> = OnceLock::new();
    DEFAULT.get_or_init(CardValidator::new)
}

/// Validates a card number with the built-in rules, detecting its type.
///
/// See [`CardValidator::validate_card`].
pub fn validate_card(input: &str) -> ValidationResult {
    default_validator().validate_card(input)
}

/// Validates a card number with the built-in rules against a type hint.
pub fn validate_card_with<'h>(input: &str, hint: impl Into<TypeHint<'h>>) -> ValidationResult {
    default_validator().validate_card_with(input, hint)
}

/// Returns true if the number is valid under the built-in rules.
#[inline]
pub fn is_valid(input: &str) -> bool {
    default_validator().is_valid(input)
}

/// Returns true if the CVC is valid for a built-in card type.
#[inline]
pub fn valid_cvc(cvc: &str, card_type: &str) -> bool {
    default_validator().valid_cvc(cvc, card_type)
}
