//! Batch validation.
//!
//! Validates many card numbers with one [`CardValidator`]. With the
//! `parallel` feature the work is spread over rayon's global pool; the
//! results are the same as the sequential path and keep the input order.

use crate::error::ValidationError;
use crate::result::ValidationResult;
use crate::validate::{CardValidator, TypeHint};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

impl CardValidator {
    /// Validates a batch of card numbers, detecting each type.
    ///
    /// Returns one result per input, in input order.
    ///
    /// # Example
    ///
    /// ```
    /// use cardcheck::CardValidator;
    ///
    /// let validator = CardValidator::new();
    /// let cards = ["4111111111111111", "1234567890123456", "378282246310005"];
    /// let results = validator.validate_batch(&cards);
    ///
    /// assert!(results[0].valid);
    /// assert!(!results[1].valid);
    /// assert_eq!(results[2].card_type, "amex");
    /// ```
    pub fn validate_batch<S: AsRef<str> + Sync>(&self, cards: &[S]) -> Vec<ValidationResult> {
        #[cfg(feature = "parallel")]
        let iter = cards.par_iter();
        #[cfg(not(feature = "parallel"))]
        let iter = cards.iter();

        iter.map(|card| self.validate_card(card.as_ref())).collect()
    }

    /// Validates a batch and splits it into accepted results and rejections.
    ///
    /// Rejections carry the index of the input they came from.
    pub fn validate_partitioned<S: AsRef<str> + Sync>(
        &self,
        cards: &[S],
    ) -> (Vec<ValidationResult>, Vec<(usize, ValidationError)>) {
        #[cfg(feature = "parallel")]
        let iter = cards.par_iter();
        #[cfg(not(feature = "parallel"))]
        let iter = cards.iter();

        let checked: Vec<_> = iter
            .map(|card| self.check_card(card.as_ref(), TypeHint::Detect))
            .collect();

        let mut valid = Vec::new();
        let mut invalid = Vec::new();
        for (i, result) in checked.into_iter().enumerate() {
            match result {
                Ok(result) => valid.push(result),
                Err(err) => invalid.push((i, err)),
            }
        }

        (valid, invalid)
    }

    /// Counts valid and invalid numbers in a batch.
    ///
    /// Returns `(valid, invalid)`.
    ///
    /// # Example
    ///
    /// ```
    /// use cardcheck::CardValidator;
    ///
    /// let cards = ["4111111111111111", "1234567890123456", "5500000000000004"];
    /// assert_eq!(CardValidator::new().count_valid(&cards), (2, 1));
    /// ```
    pub fn count_valid<S: AsRef<str> + Sync>(&self, cards: &[S]) -> (usize, usize) {
        #[cfg(feature = "parallel")]
        let iter = cards.par_iter();
        #[cfg(not(feature = "parallel"))]
        let iter = cards.iter();

        let valid = iter.filter(|card| self.is_valid(card.as_ref())).count();
        tracing::debug!(total = cards.len(), valid, "validated batch");

        (valid, cards.len() - valid)
    }
}
