//! Card type detection.
//!
//! Detection resolves a cleaned card number to a type identifier in two
//! steps:
//!
//! 1. The number is truncated to the BIN cache key (6 digits by default). If
//!    the cache maps that key, its type wins outright, even over a pattern
//!    that would also match, and even if the type is not in the registry.
//! 2. Otherwise the registry is walked in order and the first rule whose
//!    prefix pattern matches decides.
//!
//! No match is not an error; the detector returns `None`.

use crate::cache::{cache_key, BinCache, BIN_CACHE_KEY_LEN};
use crate::registry::Registry;
use std::borrow::Cow;

/// Resolves card numbers to type identifiers.
///
/// # Example
///
/// ```
/// use cardcheck::cache::MemoryBinCache;
/// use cardcheck::detect::TypeDetector;
/// use cardcheck::registry::Registry;
///
/// let registry = Registry::builtin();
/// let cache = MemoryBinCache::from_entries([("456789", "testCard")]).unwrap();
/// let detector = TypeDetector::new(&registry).with_cache(&cache);
///
/// // Pattern detection
/// assert_eq!(detector.detect("4111111111111111").as_deref(), Some("visa"));
///
/// // The cache overrides the Visa pattern
/// assert_eq!(detector.detect("4567891234567891").as_deref(), Some("testCard"));
///
/// assert_eq!(detector.detect("9999999999999999"), None);
/// ```
#[derive(Clone, Copy)]
pub struct TypeDetector<'a> {
    registry: &'a Registry,
    cache: Option<&'a dyn BinCache>,
    key_len: usize,
}

impl<'a> TypeDetector<'a> {
    /// Creates a detector over a registry, without a cache.
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            cache: None,
            key_len: BIN_CACHE_KEY_LEN,
        }
    }

    /// Consults `cache` before the registry's patterns, keyed by the
    /// cache's own [`BinCache::key_len`].
    pub fn with_cache(mut self, cache: &'a dyn BinCache) -> Self {
        self.cache = Some(cache);
        self.key_len = cache.key_len();
        self
    }

    /// Overrides the number of leading digits used as the cache key.
    pub fn with_key_len(mut self, key_len: usize) -> Self {
        self.key_len = key_len;
        self
    }

    /// Detects the type of a cleaned (digits-only) card number.
    pub fn detect(&self, number: &str) -> Option<Cow<'a, str>> {
        if let Some(card_type) = self.lookup_cache(number) {
            return Some(Cow::Owned(card_type));
        }

        let rule = self.registry.first_match(number)?;
        tracing::trace!(card_type = rule.card_type(), "card type matched by pattern");
        Some(Cow::Borrowed(rule.card_type()))
    }

    fn lookup_cache(&self, number: &str) -> Option<String> {
        let cache = self.cache?;
        if number.is_empty() {
            return None;
        }

        let key = cache_key(number, self.key_len);
        if !cache.has(key) {
            return None;
        }

        let card_type = cache.get(key)?;
        tracing::debug!(bin = key, card_type = %card_type, "card type resolved from BIN cache");
        Some(card_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryBinCache;
    use crate::rule::types;
    use std::collections::HashMap;

    fn detect(number: &str) -> Option<String> {
        let registry = Registry::builtin();
        TypeDetector::new(&registry)
            .detect(number)
            .map(Cow::into_owned)
    }

    #[test]
    fn test_debit_detection() {
        assert_eq!(detect("4917300800000000").as_deref(), Some(types::VISA_ELECTRON));
        assert_eq!(detect("6759649826438453").as_deref(), Some(types::MAESTRO));
        assert_eq!(detect("5018643742501295").as_deref(), Some(types::MAESTRO));
        assert_eq!(detect("6304418808547453").as_deref(), Some(types::MAESTRO));
        assert_eq!(
            detect("6007220000000004").as_deref(),
            Some(types::FORBRUGSFORENINGEN)
        );
        assert_eq!(detect("5019717010103742").as_deref(), Some(types::DANKORT));
    }

    #[test]
    fn test_credit_detection() {
        assert_eq!(detect("4111111111111111").as_deref(), Some(types::VISA));
        assert_eq!(detect("5555555555554444").as_deref(), Some(types::MASTERCARD));
        assert_eq!(detect("2221000002222221").as_deref(), Some(types::MASTERCARD));
        assert_eq!(detect("378282246310005").as_deref(), Some(types::AMEX));
        assert_eq!(detect("30569309025904").as_deref(), Some(types::DINERS_CLUB));
        assert_eq!(detect("6011111111111117").as_deref(), Some(types::DISCOVER));
        assert_eq!(detect("6271136264806203568").as_deref(), Some(types::UNIONPAY));
        assert_eq!(detect("3530111333300000").as_deref(), Some(types::JCB));
    }

    #[test]
    fn test_issuer_specific_detection() {
        // Elo BIN inside the Visa range
        assert_eq!(detect("4389351648020055").as_deref(), Some(types::ELO));
        assert_eq!(detect("6362970000457013").as_deref(), Some(types::ELO));
        // Hipercard BIN inside the Discover 60 range
        assert_eq!(detect("6062825624254001").as_deref(), Some(types::HIPERCARD));
    }

    #[test]
    fn test_partial_numbers() {
        assert_eq!(detect("4").as_deref(), Some(types::VISA));
        assert_eq!(detect("37").as_deref(), Some(types::AMEX));
        assert_eq!(detect("3").as_deref(), None);
    }

    #[test]
    fn test_unknown_type() {
        assert_eq!(detect("1234567891234567"), None);
        assert_eq!(detect("9999999999999999"), None);
        assert_eq!(detect(""), None);
    }

    #[test]
    fn test_cache_overrides_pattern() {
        let registry = Registry::builtin();
        let cache = MemoryBinCache::from_entries([("456789", "testCard")]).unwrap();
        let detector = TypeDetector::new(&registry).with_cache(&cache);

        assert_eq!(
            detector.detect("4567891234567891").as_deref(),
            Some("testCard")
        );
        // Neighbouring BIN still falls through to the Visa pattern
        assert_eq!(
            detector.detect("4567801234567891").as_deref(),
            Some(types::VISA)
        );
    }

    #[test]
    fn test_cache_extends_detection() {
        let registry = Registry::builtin();
        let mut cache = HashMap::new();
        cache.insert("123456".to_string(), "testCard".to_string());
        let detector = TypeDetector::new(&registry).with_cache(&cache);

        assert_eq!(
            detector.detect("1234567891234567").as_deref(),
            Some("testCard")
        );
    }

    #[test]
    fn test_cache_key_len() {
        let registry = Registry::builtin();
        let mut cache = HashMap::new();
        cache.insert("45678912".to_string(), "eightDigit".to_string());

        let six = TypeDetector::new(&registry).with_cache(&cache);
        assert_eq!(six.detect("4567891234567891").as_deref(), Some(types::VISA));

        let eight = six.with_key_len(8);
        assert_eq!(
            eight.detect("4567891234567891").as_deref(),
            Some("eightDigit")
        );
    }

    #[test]
    fn test_key_len_follows_cache() {
        let registry = Registry::builtin();
        let mut cache = MemoryBinCache::with_key_len(8);
        cache.insert("45678912", "eightDigit").unwrap();

        let detector = TypeDetector::new(&registry).with_cache(&cache);
        assert_eq!(
            detector.detect("4567891234567891").as_deref(),
            Some("eightDigit")
        );
        assert_eq!(
            detector.with_key_len(6).detect("4567891234567891").as_deref(),
            Some(types::VISA)
        );
    }

    #[test]
    fn test_empty_number_skips_cache() {
        let registry = Registry::builtin();
        let mut cache = HashMap::new();
        cache.insert(String::new(), "empty".to_string());
        let detector = TypeDetector::new(&registry).with_cache(&cache);

        assert_eq!(detector.detect(""), None);
    }

    #[test]
    fn test_short_number_uses_whole_key() {
        let registry = Registry::builtin();
        let mut cache = HashMap::new();
        cache.insert("1234".to_string(), "short".to_string());
        let detector = TypeDetector::new(&registry).with_cache(&cache);

        assert_eq!(detector.detect("1234").as_deref(), Some("short"));
    }
}
