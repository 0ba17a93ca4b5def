//! Card number validation.
//!
//! [`CardValidator`] owns a rule registry and an optional BIN cache and
//! combines cleaning, type resolution and the pattern, length and Luhn checks
//! into a single verdict.
//!
//! Malformed input is never an error at this level: empty, too short, too
//! long, unknown or checksum-failing numbers all come back as an invalid
//! [`ValidationResult`]. Use [`CardValidator::check_card`] to learn why.

use crate::cache::{BinCache, BIN_CACHE_KEY_LEN};
use crate::cvc;
use crate::detect::TypeDetector;
use crate::error::{CvcError, RuleError, ValidationError};
use crate::luhn;
use crate::registry::Registry;
use crate::result::ValidationResult;
use crate::rule::RuleConfig;
use std::fmt;
use std::sync::Arc;

/// Which card type(s) a number should be validated against.
///
/// # Example
///
/// ```
/// use cardcheck::{CardValidator, TypeHint};
///
/// let validator = CardValidator::new();
///
/// assert!(validator.validate_card_with("4242424242424242", "visa").valid);
/// assert!(validator.validate_card_with("4242424242424242", ["mastercard", "visa"]).valid);
/// assert!(!validator.validate_card_with("4242424242424242", ["mastercard", "visaelectron"]).valid);
/// assert!(validator.validate_card_with("4242424242424242", TypeHint::Detect).valid);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TypeHint<'a> {
    /// Detect the type from the number.
    #[default]
    Detect,
    /// Validate against exactly this type.
    Single(&'a str),
    /// Valid if the number validates against any of these types.
    AnyOf(Vec<&'a str>),
}

impl<'a> TypeHint<'a> {
    /// Collapses empty hints to [`TypeHint::Detect`].
    fn normalized(self) -> Self {
        match self {
            Self::Single("") => Self::Detect,
            Self::AnyOf(types) if types.is_empty() => Self::Detect,
            other => other,
        }
    }
}

impl<'a> From<&'a str> for TypeHint<'a> {
    fn from(card_type: &'a str) -> Self {
        Self::Single(card_type)
    }
}

impl<'a> From<&'a String> for TypeHint<'a> {
    fn from(card_type: &'a String) -> Self {
        Self::Single(card_type)
    }
}

impl<'a> From<Option<&'a str>> for TypeHint<'a> {
    fn from(card_type: Option<&'a str>) -> Self {
        card_type.map_or(Self::Detect, Self::Single)
    }
}

impl<'a> From<&'a [&'a str]> for TypeHint<'a> {
    fn from(types: &'a [&'a str]) -> Self {
        Self::AnyOf(types.to_vec())
    }
}

impl<'a, const N: usize> From<[&'a str; N]> for TypeHint<'a> {
    fn from(types: [&'a str; N]) -> Self {
        Self::AnyOf(types.to_vec())
    }
}

impl<'a> From<Vec<&'a str>> for TypeHint<'a> {
    fn from(types: Vec<&'a str>) -> Self {
        Self::AnyOf(types)
    }
}

impl<'a> From<&'a [String]> for TypeHint<'a> {
    fn from(types: &'a [String]) -> Self {
        Self::AnyOf(types.iter().map(String::as_str).collect())
    }
}

/// Strips every character that is not an ASCII digit.
///
/// Spaces, dashes and any other noise are discarded; the order of the
/// remaining digits is preserved.
///
/// # Example
///
/// ```
/// use cardcheck::clean_number;
///
/// assert_eq!(clean_number("4242-4242 4242.4242"), "4242424242424242");
/// assert_eq!(clean_number("   "), "");
/// ```
pub fn clean_number(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Validates card numbers and CVCs against a rule registry.
///
/// A validator is immutable after construction and cheap to clone; share it
/// freely across threads.
///
/// # Example
///
/// ```
/// use cardcheck::CardValidator;
/// use cardcheck::cache::MemoryBinCache;
/// use cardcheck::rule::RuleConfig;
///
/// let cache = MemoryBinCache::from_entries([("123456", "testCard")]).unwrap();
/// let validator = CardValidator::from_config(
///     cache,
///     &[RuleConfig::new("testCard", "^123456", [16]).luhn(false)],
/// )
/// .unwrap();
///
/// let result = validator.validate_card("1234 5678 9123 4567");
/// assert!(result.valid);
/// assert_eq!(result.number, "1234567891234567");
/// assert_eq!(result.card_type, "testCard");
/// ```
#[derive(Clone)]
pub struct CardValidator {
    registry: Registry,
    cache: Option<Arc<dyn BinCache>>,
    cache_key_len: Option<usize>,
}

impl CardValidator {
    /// Creates a validator with the built-in registry and no cache.
    pub fn new() -> Self {
        Self {
            registry: Registry::builtin(),
            cache: None,
            cache_key_len: None,
        }
    }

    /// Creates a validator from a BIN cache and extra rule configs.
    ///
    /// Each config replaces the built-in rule of the same type, or is
    /// appended after the built-in rules if its type is new.
    pub fn from_config<'a, C>(
        cache: C,
        rules: impl IntoIterator<Item = &'a RuleConfig>,
    ) -> Result<Self, RuleError>
    where
        C: BinCache + 'static,
    {
        let registry = Registry::builder().with_configs(rules)?.build();
        Ok(Self::new().with_registry(registry).with_cache(cache))
    }

    /// Replaces the rule registry.
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Consults `cache` during type detection.
    ///
    /// Lookup keys take the cache's [`BinCache::key_len`] unless
    /// [`with_cache_key_len`](Self::with_cache_key_len) overrides it.
    pub fn with_cache<C: BinCache + 'static>(self, cache: C) -> Self {
        self.with_shared_cache(Arc::new(cache))
    }

    /// Consults a shared cache during type detection.
    pub fn with_shared_cache(mut self, cache: Arc<dyn BinCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Overrides the number of leading digits used as the cache key.
    pub fn with_cache_key_len(mut self, key_len: usize) -> Self {
        self.cache_key_len = Some(key_len);
        self
    }

    /// Returns the number of leading digits used as the cache key.
    pub fn cache_key_len(&self) -> usize {
        match (self.cache_key_len, &self.cache) {
            (Some(key_len), _) => key_len,
            (None, Some(cache)) => cache.key_len(),
            (None, None) => BIN_CACHE_KEY_LEN,
        }
    }

    /// Returns the rule registry.
    #[inline]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    fn detector(&self) -> TypeDetector<'_> {
        let detector = match &self.cache {
            Some(cache) => TypeDetector::new(&self.registry).with_cache(&**cache),
            None => TypeDetector::new(&self.registry),
        };
        match self.cache_key_len {
            Some(key_len) => detector.with_key_len(key_len),
            None => detector,
        }
    }

    /// Detects the type of a card number.
    ///
    /// The input is cleaned first. Returns `None` if neither the cache nor
    /// any rule recognises the number.
    ///
    /// # Example
    ///
    /// ```
    /// use cardcheck::CardValidator;
    ///
    /// let validator = CardValidator::new();
    /// assert_eq!(validator.detect_type("4917 3008 0000 0000").as_deref(), Some("visaelectron"));
    /// assert_eq!(validator.detect_type("1234"), None);
    /// ```
    pub fn detect_type(&self, number: &str) -> Option<String> {
        let cleaned = clean_number(number);
        self.detector().detect(&cleaned).map(|t| t.into_owned())
    }

    /// Validates a card number, detecting its type.
    ///
    /// # Example
    ///
    /// ```
    /// use cardcheck::CardValidator;
    ///
    /// let validator = CardValidator::new();
    ///
    /// let result = validator.validate_card("4242-4242-4242-4242");
    /// assert!(result.valid);
    /// assert_eq!(result.card_type, "visa");
    ///
    /// let result = validator.validate_card("4242424242424241");
    /// assert!(!result.valid);
    /// assert!(result.number.is_empty());
    /// ```
    pub fn validate_card(&self, input: &str) -> ValidationResult {
        self.validate_card_with(input, TypeHint::Detect)
    }

    /// Validates a card number against a type hint.
    pub fn validate_card_with<'h>(
        &self,
        input: &str,
        hint: impl Into<TypeHint<'h>>,
    ) -> ValidationResult {
        match self.check_card(input, hint) {
            Ok(result) => result,
            Err(err) => {
                tracing::debug!(reason = %err, "card number rejected");
                ValidationResult::invalid()
            }
        }
    }

    /// Returns true if the number is valid for its detected type.
    #[inline]
    pub fn is_valid(&self, input: &str) -> bool {
        self.validate_card(input).valid
    }

    /// Validates a card number, returning the reason on failure.
    ///
    /// # Example
    ///
    /// ```
    /// use cardcheck::{CardValidator, ValidationError};
    ///
    /// let validator = CardValidator::new();
    /// assert_eq!(
    ///     validator.check_card("4242424242424241", "visa").unwrap_err(),
    ///     ValidationError::InvalidChecksum
    /// );
    /// ```
    pub fn check_card<'h>(
        &self,
        input: &str,
        hint: impl Into<TypeHint<'h>>,
    ) -> Result<ValidationResult, ValidationError> {
        let number = clean_number(input);
        if number.is_empty() {
            return Err(ValidationError::NoDigits);
        }

        match hint.into().normalized() {
            TypeHint::Detect => {
                let card_type = self
                    .detector()
                    .detect(&number)
                    .ok_or(ValidationError::UnknownType)?
                    .into_owned();
                self.check_as(number, card_type)
            }
            TypeHint::Single(card_type) => self.check_as(number, card_type.to_string()),
            TypeHint::AnyOf(types) => {
                for card_type in &types {
                    if self.check_digits(&number, card_type).is_ok() {
                        return Ok(ValidationResult::valid(number, card_type.to_string()));
                    }
                }
                Err(ValidationError::NoAcceptedType {
                    candidates: types.iter().map(|t| t.to_string()).collect(),
                })
            }
        }
    }

    fn check_as(
        &self,
        number: String,
        card_type: String,
    ) -> Result<ValidationResult, ValidationError> {
        self.check_digits(&number, &card_type)?;
        Ok(ValidationResult::valid(number, card_type))
    }

    /// Applies the pattern, length and Luhn checks for one type.
    fn check_digits(&self, number: &str, card_type: &str) -> Result<(), ValidationError> {
        let rule = self
            .registry
            .get(card_type)
            .ok_or_else(|| ValidationError::UnregisteredType(card_type.to_string()))?;

        if !rule.matches(number) {
            return Err(ValidationError::PatternMismatch {
                card_type: card_type.to_string(),
            });
        }

        if !rule.is_valid_length(number.len()) {
            return Err(ValidationError::InvalidLength {
                card_type: card_type.to_string(),
                length: number.len(),
                valid_lengths: rule.lengths().to_vec(),
            });
        }

        if rule.requires_luhn() && !luhn::is_valid(number) {
            return Err(ValidationError::InvalidChecksum);
        }

        Ok(())
    }

    /// Validates a CVC for a card type.
    ///
    /// # Example
    ///
    /// ```
    /// use cardcheck::CardValidator;
    ///
    /// let validator = CardValidator::new();
    /// assert!(validator.valid_cvc("123", "visa"));
    /// assert!(validator.valid_cvc("1234", "amex"));
    /// assert!(!validator.valid_cvc("1234", "visa"));
    /// assert!(!validator.valid_cvc("12e", "visa"));
    /// ```
    #[inline]
    pub fn valid_cvc(&self, cvc: &str, card_type: &str) -> bool {
        self.check_cvc(cvc, card_type).is_ok()
    }

    /// Validates a CVC for a card type, returning the reason on failure.
    pub fn check_cvc(&self, cvc: &str, card_type: &str) -> Result<(), CvcError> {
        cvc::check_cvc(&self.registry, cvc, card_type)
    }
}

impl Default for CardValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CardValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardValidator")
            .field("types", &self.registry.types().collect::<Vec<_>>())
            .field("cache", &self.cache.is_some())
            .field("cache_key_len", &self.cache_key_len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryBinCache;
    use crate::rule::types;

    const VISA: &str = "4242424242424242";
    const VISA_FORMATTED: &str = "4242-4242-4242-4242";
    const VISA_SPACES: &str = "4242 4242 4242 4242";
    const AMEX: &str = "378282246310005";
    const UNIONPAY: &str = "6271136264806203568";

    fn test_card_validator() -> CardValidator {
        let cache =
            MemoryBinCache::from_entries([("123456", "testCard"), ("456789", "testCard")])
                .unwrap();
        CardValidator::from_config(
            cache,
            &[RuleConfig::new("testCard", "^(123456|456789)", [16]).luhn(false)],
        )
        .unwrap()
    }

    #[test]
    fn test_validate_visa() {
        let result = CardValidator::new().validate_card(VISA);
        assert!(result.valid);
        assert_eq!(result.number, VISA);
        assert_eq!(result.card_type, types::VISA);
    }

    #[test]
    fn test_cleaning() {
        let validator = CardValidator::new();
        let plain = validator.validate_card(VISA);
        assert_eq!(validator.validate_card(VISA_FORMATTED), plain);
        assert_eq!(validator.validate_card(VISA_SPACES), plain);
        assert_eq!(validator.validate_card("card: 4242/4242/4242/4242!"), plain);
    }

    #[test]
    fn test_empty_and_whitespace() {
        let validator = CardValidator::new();
        for input in ["", "       ", "----", "abc"] {
            let result = validator.validate_card(input);
            assert_eq!(result, ValidationResult::invalid(), "input {:?}", input);
            assert_eq!(
                validator.check_card(input, TypeHint::Detect).unwrap_err(),
                ValidationError::NoDigits
            );
        }
    }

    #[test]
    fn test_length_bounds() {
        let validator = CardValidator::new();
        assert!(!validator.is_valid("42424242424242424"));
        assert!(!validator.is_valid("424242424"));
        assert!(matches!(
            validator.check_card("42424242424242424", TypeHint::Detect),
            Err(ValidationError::InvalidLength { length: 17, .. })
        ));
    }

    #[test]
    fn test_checksum_failure() {
        let validator = CardValidator::new();
        assert_eq!(
            validator.check_card("4242424242424241", TypeHint::Detect).unwrap_err(),
            ValidationError::InvalidChecksum
        );
    }

    #[test]
    fn test_luhn_not_required() {
        let validator = CardValidator::new();
        let result = validator.validate_card(UNIONPAY);
        assert!(result.valid);
        assert_eq!(result.card_type, types::UNIONPAY);

        // Corrupted check digit is still accepted for UnionPay
        let corrupted = "6271136264806203569";
        assert!(!luhn::is_valid(corrupted));
        assert!(validator.is_valid(corrupted));
    }

    #[test]
    fn test_single_hint() {
        let validator = CardValidator::new();
        assert!(validator.validate_card_with(VISA, types::VISA).valid);
        assert_eq!(
            validator.check_card(VISA, types::MASTERCARD).unwrap_err(),
            ValidationError::PatternMismatch {
                card_type: types::MASTERCARD.to_string()
            }
        );
        // A broad hint accepts numbers detection would give to a narrower type
        let electron = validator.validate_card_with("4917300800000000", types::VISA);
        assert!(electron.valid);
        assert_eq!(electron.card_type, types::VISA);
    }

    #[test]
    fn test_unregistered_hint() {
        let validator = CardValidator::new();
        let result = validator.validate_card_with(VISA, "nosuchcard");
        assert_eq!(result, ValidationResult::invalid());
        assert_eq!(
            validator.check_card(VISA, "nosuchcard").unwrap_err(),
            ValidationError::UnregisteredType("nosuchcard".into())
        );
    }

    #[test]
    fn test_any_of_hint() {
        let validator = CardValidator::new();

        let result = validator.validate_card_with(VISA, [types::MASTERCARD, types::VISA]);
        assert!(result.valid);
        assert_eq!(result.card_type, types::VISA);

        let result = validator.validate_card_with(VISA, [types::MASTERCARD, types::VISA_ELECTRON]);
        assert!(!result.valid);
        assert_eq!(
            validator
                .check_card(VISA, vec![types::MASTERCARD, types::VISA_ELECTRON])
                .unwrap_err(),
            ValidationError::NoAcceptedType {
                candidates: vec![types::MASTERCARD.into(), types::VISA_ELECTRON.into()]
            }
        );
    }

    #[test]
    fn test_any_of_first_success_wins() {
        let validator = CardValidator::new();
        let result = validator.validate_card_with(
            "4917300800000000",
            [types::VISA, types::VISA_ELECTRON],
        );
        assert_eq!(result.card_type, types::VISA);
    }

    #[test]
    fn test_empty_hints_detect() {
        let validator = CardValidator::new();
        let empty: [&str; 0] = [];
        assert_eq!(validator.validate_card_with(VISA, "").card_type, types::VISA);
        assert_eq!(validator.validate_card_with(VISA, empty).card_type, types::VISA);
        assert_eq!(
            validator.validate_card_with(VISA, None::<&str>).card_type,
            types::VISA
        );
    }

    #[test]
    fn test_string_hints() {
        let validator = CardValidator::new();
        let owned = String::from(types::AMEX);
        assert!(validator.validate_card_with(AMEX, &owned).valid);

        let list = vec![types::VISA.to_string(), types::AMEX.to_string()];
        assert!(validator.validate_card_with(AMEX, list.as_slice()).valid);
    }

    #[test]
    fn test_unknown_type() {
        let validator = CardValidator::new();
        assert_eq!(
            validator.check_card("1234567891234567", TypeHint::Detect).unwrap_err(),
            ValidationError::UnknownType
        );
    }

    #[test]
    fn test_cache_backed_type() {
        let validator = test_card_validator();

        let result = validator.validate_card("1234567891234567");
        assert!(result.valid);
        assert_eq!(result.card_type, "testCard");

        // Would be Visa by pattern
        let result = validator.validate_card("4567891234567891");
        assert!(result.valid);
        assert_eq!(result.card_type, "testCard");

        // Other Visa numbers are unaffected
        assert_eq!(validator.validate_card(VISA).card_type, types::VISA);
    }

    #[test]
    fn test_cache_type_not_registered() {
        let cache = MemoryBinCache::from_entries([("424242", "ghost")]).unwrap();
        let validator = CardValidator::new().with_cache(cache);

        assert_eq!(validator.detect_type(VISA).as_deref(), Some("ghost"));
        assert_eq!(
            validator.check_card(VISA, TypeHint::Detect).unwrap_err(),
            ValidationError::UnregisteredType("ghost".into())
        );
    }

    #[test]
    fn test_cache_key_len() {
        let mut cache = MemoryBinCache::with_key_len(8);
        cache.insert("42424242", "testCard").unwrap();
        let validator = CardValidator::new().with_cache(cache);

        assert_eq!(validator.cache_key_len(), 8);
        assert_eq!(validator.detect_type(VISA).as_deref(), Some("testCard"));
    }

    #[test]
    fn test_cache_key_len_override() {
        let mut cache = MemoryBinCache::with_key_len(8);
        cache.insert("42424242", "testCard").unwrap();
        let shared: Arc<dyn BinCache> = Arc::new(cache);

        let shared_validator = CardValidator::new().with_shared_cache(Arc::clone(&shared));
        assert_eq!(shared_validator.detect_type(VISA).as_deref(), Some("testCard"));

        // Override holds whichever order the builders run in
        let before = CardValidator::new()
            .with_cache_key_len(6)
            .with_shared_cache(Arc::clone(&shared));
        let after = CardValidator::new()
            .with_shared_cache(shared)
            .with_cache_key_len(6);
        for validator in [before, after] {
            assert_eq!(validator.cache_key_len(), 6);
            assert_eq!(validator.detect_type(VISA).as_deref(), Some(types::VISA));
        }

        assert_eq!(CardValidator::new().cache_key_len(), BIN_CACHE_KEY_LEN);
    }

    #[test]
    fn test_detect_type() {
        let validator = CardValidator::new();
        assert_eq!(validator.detect_type(VISA_SPACES).as_deref(), Some(types::VISA));
        assert_eq!(validator.detect_type(""), None);
    }

    #[test]
    fn test_valid_cvc() {
        let validator = CardValidator::new();
        assert!(validator.valid_cvc("123", types::VISA));
        assert!(validator.valid_cvc("1234", types::AMEX));
        assert!(!validator.valid_cvc("123", ""));
        assert!(!validator.valid_cvc("", types::VISA));
    }

    #[test]
    fn test_validator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CardValidator>();
        assert_send_sync::<ValidationResult>();
    }
}
