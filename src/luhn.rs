//! Luhn algorithm implementation for card number validation.
//!
//! The Luhn algorithm (also known as the "modulus 10" algorithm) is a checksum
//! formula used to validate card numbers and other identification numbers.
//!
//! Digits are addressed by index from the left. Which indices get doubled
//! depends on the parity of the length, so the rightmost digit (the check
//! digit) is always in the undoubled class for both even-length (16-digit)
//! and odd-length (13/15-digit) numbers.

/// Lookup table for doubled digits: double the value, subtract 9 if >= 10.
/// Index is the digit (0-9), value is the transformed result.
const DOUBLE_TABLE: [u8; 10] = [0, 2, 4, 6, 8, 1, 3, 5, 7, 9];

/// Validates a card number using the Luhn algorithm.
///
/// # Arguments
///
/// * `digits` - A slice of digits (0-9) representing the card number.
///
/// # Returns
///
/// `true` if the checksum is valid, `false` otherwise (including for an
/// empty slice).
///
/// # Example
///
/// ```
/// use cardcheck::luhn::validate;
///
/// let digits = [4, 2, 4, 2, 4, 2, 4, 2, 4, 2, 4, 2, 4, 2, 4, 2];
/// assert!(validate(&digits));
///
/// let invalid = [4, 2, 4, 2, 4, 2, 4, 2, 4, 2, 4, 2, 4, 2, 4, 1];
/// assert!(!validate(&invalid));
/// ```
#[inline]
pub fn validate(digits: &[u8]) -> bool {
    if digits.is_empty() {
        return false;
    }

    checksum(digits) % 10 == 0
}

/// Validates a string of ASCII digits using the Luhn algorithm.
///
/// The input must already be cleaned; any non-digit character makes the
/// result `false`.
///
/// # Example
///
/// ```
/// use cardcheck::luhn::is_valid;
///
/// assert!(is_valid("4242424242424242"));
/// assert!(!is_valid("4242424242424241"));
/// assert!(!is_valid("4242-4242-4242-4242"));
/// ```
pub fn is_valid(number: &str) -> bool {
    match to_digits(number) {
        Some(digits) => validate(&digits),
        None => false,
    }
}

/// Computes the Luhn sum (not reduced modulo 10) for a sequence of digits.
#[inline]
pub fn checksum(digits: &[u8]) -> u32 {
    // Indices with this parity are doubled; the rest are summed as-is.
    let doubled_parity = digits.len() % 2;

    digits
        .iter()
        .enumerate()
        .map(|(i, &digit)| {
            if i % 2 == doubled_parity {
                DOUBLE_TABLE[digit as usize] as u32
            } else {
                digit as u32
            }
        })
        .sum()
}

/// Generates the check digit for a partial card number.
///
/// Given digits without the check digit, computes the digit that makes the
/// full number pass Luhn validation.
///
/// # Example
///
/// ```
/// use cardcheck::luhn::generate_check_digit;
///
/// let partial = [4, 2, 4, 2, 4, 2, 4, 2, 4, 2, 4, 2, 4, 2, 4];
/// assert_eq!(generate_check_digit(&partial), 2);
/// ```
pub fn generate_check_digit(digits: &[u8]) -> u8 {
    // Appending a zero check digit puts every existing digit in its final
    // parity class, and a zero contributes nothing to the sum.
    let mut padded = Vec::with_capacity(digits.len() + 1);
    padded.extend_from_slice(digits);
    padded.push(0);

    ((10 - (checksum(&padded) % 10)) % 10) as u8
}

/// Converts an ASCII digit string into digit values.
///
/// Returns `None` if the string contains anything but `0`-`9`.
pub fn to_digits(number: &str) -> Option<Vec<u8>> {
    number
        .bytes()
        .map(|b| b.is_ascii_digit().then(|| b - b'0'))
        .collect()
}
