//! CVC/CVV/CID validation.
//!
//! A card verification code is valid for a type when it consists only of
//! decimal digits and its length is one the type's rule accepts. Most types
//! print three digits; American Express accepts three or four.
//!
//! # Example
//!
//! ```
//! use cardcheck::cvc::check_cvc;
//! use cardcheck::registry::Registry;
//! use cardcheck::CvcError;
//!
//! let registry = Registry::builtin();
//! assert!(check_cvc(&registry, "123", "visa").is_ok());
//! assert!(check_cvc(&registry, "1234", "amex").is_ok());
//! assert!(matches!(
//!     check_cvc(&registry, "1234", "visa"),
//!     Err(CvcError::InvalidLength { .. })
//! ));
//! ```

use crate::error::CvcError;
use crate::registry::Registry;

/// Validates a CVC for a card type, returning the reason on failure.
///
/// Checks run in order: empty input, non-digit characters, unknown type,
/// then length.
pub fn check_cvc(registry: &Registry, cvc: &str, card_type: &str) -> Result<(), CvcError> {
    if cvc.is_empty() {
        return Err(CvcError::Empty);
    }

    if let Some((position, character)) = cvc.chars().enumerate().find(|(_, c)| !c.is_ascii_digit())
    {
        return Err(CvcError::InvalidCharacter {
            character,
            position,
        });
    }

    let rule = registry
        .get(card_type)
        .ok_or_else(|| CvcError::UnregisteredType(card_type.to_string()))?;

    if !rule.is_valid_cvc_length(cvc.len()) {
        return Err(CvcError::InvalidLength {
            card_type: card_type.to_string(),
            length: cvc.len(),
            valid_lengths: rule.cvc_lengths().to_vec(),
        });
    }

    Ok(())
}

/// Returns true if the CVC is valid for the card type.
#[inline]
pub fn valid_cvc(registry: &Registry, cvc: &str, card_type: &str) -> bool {
    check_cvc(registry, cvc, card_type).is_ok()
}
