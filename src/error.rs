//! Error types for card validation.
//!
//! The boolean APIs (`validate_card`, `valid_cvc`, `valid_date`) never return
//! these; they are exposed by the `check_*` variants for callers that want to
//! know exactly why an input was rejected, and by registry/cache assembly.

use thiserror::Error;

/// Reasons a card number can be rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The input contained no digits after cleaning.
    #[error("card number contains no digits")]
    NoDigits,

    /// No cache entry or registry rule matched the number.
    #[error("unknown card type - check the card number prefix")]
    UnknownType,

    /// The requested (or detected) type is not in the registry.
    #[error("card type '{0}' is not registered")]
    UnregisteredType(String),

    /// The number does not match the type's prefix pattern.
    #[error("card number does not match the {card_type} pattern")]
    PatternMismatch {
        /// The type the number was checked against.
        card_type: String,
    },

    /// The digit count is not accepted for the type.
    #[error("{card_type} cards must have {} digits, got {length}", join_lengths(.valid_lengths))]
    InvalidLength {
        /// The type the number was checked against.
        card_type: String,
        /// The actual number of digits.
        length: usize,
        /// The accepted lengths for the type.
        valid_lengths: Vec<usize>,
    },

    /// The Luhn checksum failed for a type that requires it.
    #[error("invalid checksum (Luhn check failed) - please verify the card number")]
    InvalidChecksum,

    /// None of the acceptable types validated the number.
    #[error("card number is not valid for any of: {}", .candidates.join(", "))]
    NoAcceptedType {
        /// The types that were tried, in order.
        candidates: Vec<String>,
    },
}

/// Reasons a CVC can be rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CvcError {
    /// The CVC is empty.
    #[error("CVC is empty")]
    Empty,

    /// The CVC contains a non-digit character.
    #[error("invalid character '{}' at position {position}", .character.escape_default())]
    InvalidCharacter {
        /// The offending character.
        character: char,
        /// Its position (0-indexed, in characters).
        position: usize,
    },

    /// The card type is empty or not registered.
    #[error("card type '{0}' is not registered")]
    UnregisteredType(String),

    /// The CVC length is not accepted for the type.
    #[error("{card_type} cards require a {} digit CVC, got {length}", join_lengths(.valid_lengths))]
    InvalidLength {
        /// The card type.
        card_type: String,
        /// Actual CVC length.
        length: usize,
        /// Accepted CVC lengths.
        valid_lengths: Vec<usize>,
    },
}

/// Reasons an expiry date can be rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    /// The year is not a four-digit `20xx` year.
    #[error("invalid expiry year '{0}' (expected 20YY)")]
    InvalidYear(String),

    /// The month is not in `01`-`12`.
    #[error("invalid expiry month '{0}' (expected 01-12)")]
    InvalidMonth(String),

    /// The date lies before the current month.
    #[error("card expired ({month:02}/{year})")]
    Expired {
        /// Expiry year.
        year: i32,
        /// Expiry month.
        month: u32,
    },
}

/// Errors raised while assembling a rule registry.
#[derive(Debug, Error)]
pub enum RuleError {
    /// A rule was configured without a type identifier.
    #[error("card type identifier must not be empty")]
    EmptyType,

    /// The rule pattern failed to compile.
    #[error("invalid pattern for card type '{card_type}': {source}")]
    InvalidPattern {
        /// The rule's type identifier.
        card_type: String,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// The rule accepts no card lengths.
    #[error("card type '{0}' must accept at least one card length")]
    NoLengths(String),

    /// The rule accepts no CVC lengths.
    #[error("card type '{0}' must accept at least one CVC length")]
    NoCvcLengths(String),

    /// Rule configuration could not be parsed.
    #[cfg(feature = "json")]
    #[error("invalid rule configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// Rule configuration could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading a BIN cache.
#[derive(Debug, Error)]
pub enum BinCacheError {
    /// The source could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The source is not valid JSON for the expected layout.
    #[cfg(feature = "json")]
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An entry's BIN is empty or contains non-digits.
    #[error("invalid BIN '{0}' (digits only)")]
    InvalidBin(String),

    /// A range entry ends before it starts.
    #[error("invalid BIN range {start}..={end}")]
    InvalidRange {
        /// Range start.
        start: String,
        /// Range end.
        end: String,
    },
}

fn join_lengths(lengths: &[usize]) -> String {
    lengths
        .iter()
        .map(|l| l.to_string())
        .collect::<Vec<_>>()
        .join(" or ")
}
