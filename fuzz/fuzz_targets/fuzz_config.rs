//! Fuzz target for JSON configuration loading.
//!
//! Tests that malformed rule and BIN cache files are rejected with errors,
//! never panics.

#![no_main]

use cardcheck::{CardValidator, MemoryBinCache, RuleConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let cache = MemoryBinCache::from_json_str(data).unwrap_or_default();

    if let Ok(rules) = RuleConfig::from_json_str(data) {
        if let Ok(validator) = CardValidator::from_config(cache, &rules) {
            let _ = validator.validate_card("4242424242424242");
            let _ = validator.validate_card("1234567891234567");
        }
    }
});
