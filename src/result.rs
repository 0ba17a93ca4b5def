//! The card validation verdict.

use std::fmt;
use zeroize::Zeroize;

/// Outcome of validating a card number.
///
/// On success `number` holds the cleaned digits and `card_type` the resolved
/// type identifier; on failure both are empty.
///
/// # Security
///
/// - `Debug` shows the number masked to its last four digits
/// - The number is zeroed when the result is dropped
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct ValidationResult {
    /// Whether the number is valid.
    pub valid: bool,
    /// The normalized digits, or empty when invalid.
    pub number: String,
    /// The card type identifier, or empty when invalid.
    #[cfg_attr(feature = "json", serde(rename = "type"))]
    pub card_type: String,
}

impl ValidationResult {
    /// The result returned for every rejected number.
    pub fn invalid() -> Self {
        Self {
            valid: false,
            number: String::new(),
            card_type: String::new(),
        }
    }

    pub(crate) fn valid(number: String, card_type: String) -> Self {
        Self {
            valid: true,
            number,
            card_type,
        }
    }

    /// Returns the last four digits, or fewer for shorter numbers.
    pub fn last_four(&self) -> &str {
        let start = self
            .number
            .char_indices()
            .rev()
            .nth(3)
            .map_or(0, |(i, _)| i);
        &self.number[start..]
    }

    /// Returns the number with all but the last four digits masked.
    ///
    /// # Example
    ///
    /// ```
    /// use cardcheck::CardValidator;
    ///
    /// let result = CardValidator::new().validate_card("4242 4242 4242 4242");
    /// assert_eq!(result.masked(), "************4242");
    /// ```
    pub fn masked(&self) -> String {
        let visible = self.last_four();
        let hidden = self.number.chars().count() - visible.chars().count();
        let mut masked = "*".repeat(hidden);
        masked.push_str(visible);
        masked
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::invalid()
    }
}

impl fmt::Debug for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationResult")
            .field("valid", &self.valid)
            .field("number", &self.masked())
            .field("card_type", &self.card_type)
            .finish()
    }
}

impl Drop for ValidationResult {
    fn drop(&mut self) {
        self.number.zeroize();
    }
}
