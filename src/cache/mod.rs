//! BIN (Bank Identification Number) range cache.
//!
//! Type detection consults a cache keyed by the first
//! [`BIN_CACHE_KEY_LEN`] digits of a card number before falling back to the
//! registry's prefix patterns. This lets BIN-range data override or extend
//! pattern detection without code changes.
//!
//! The detector only ever reads from the cache. Populating it, and any expiry
//! policy, belongs to whoever owns it.
//!
//! # Example
//!
//! ```
//! use cardcheck::cache::{BinCache, MemoryBinCache};
//!
//! let mut cache = MemoryBinCache::new();
//! cache.insert("456789", "testCard").unwrap();
//! cache.insert_range("400000", "400099", "visa").unwrap();
//!
//! assert_eq!(cache.get("456789").as_deref(), Some("testCard"));
//! assert!(cache.has("400050"));
//! assert!(!cache.has("411111"));
//! ```

mod memory;

#[cfg(feature = "json")]
mod json;

pub use memory::MemoryBinCache;

use std::collections::HashMap;
use std::sync::Arc;

/// Number of leading digits used as the cache key.
///
/// Six digits is the traditional BIN length. Issuers have been moving to
/// 8-digit BINs, so validators can override this per instance.
pub const BIN_CACHE_KEY_LEN: usize = 6;

/// Read access to a BIN-to-card-type mapping.
///
/// Implement this trait to back detection with any store. Keys are the
/// first [`BIN_CACHE_KEY_LEN`] digits of a cleaned card number (or the whole
/// number, if shorter); values are card type identifiers.
pub trait BinCache: Send + Sync {
    /// Returns the card type mapped to `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Returns true if `key` is mapped.
    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of leading digits this cache is keyed by.
    ///
    /// Validators build lookup keys of this length unless told otherwise.
    fn key_len(&self) -> usize {
        BIN_CACHE_KEY_LEN
    }
}

impl BinCache for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }

    fn has(&self, key: &str) -> bool {
        self.contains_key(key)
    }
}

impl<T: BinCache + ?Sized> BinCache for Arc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn has(&self, key: &str) -> bool {
        (**self).has(key)
    }

    fn key_len(&self) -> usize {
        (**self).key_len()
    }
}

impl<T: BinCache + ?Sized> BinCache for Box<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn has(&self, key: &str) -> bool {
        (**self).has(key)
    }

    fn key_len(&self) -> usize {
        (**self).key_len()
    }
}

/// Truncates a number to its cache key: the first `len` characters.
///
/// # Example
///
/// ```
/// use cardcheck::cache::{cache_key, BIN_CACHE_KEY_LEN};
///
/// assert_eq!(cache_key("4567891234567891", BIN_CACHE_KEY_LEN), "456789");
/// assert_eq!(cache_key("4567", BIN_CACHE_KEY_LEN), "4567");
/// ```
#[inline]
pub fn cache_key(number: &str, len: usize) -> &str {
    match number.char_indices().nth(len) {
        Some((end, _)) => &number[..end],
        None => number,
    }
}

/// An inclusive range of fixed-width BINs, ordered by start then end.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct BinRange {
    pub(crate) start: u64,
    pub(crate) end: u64,
}

impl BinRange {
    pub(crate) fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    #[inline]
    pub(crate) fn contains(&self, bin: u64) -> bool {
        bin >= self.start && bin <= self.end
    }

    /// Parses an all-digit BIN string.
    ///
    /// Returns `None` for empty strings, non-digits, or values that do not
    /// fit in a `u64`.
    pub(crate) fn parse_bin(bin: &str) -> Option<u64> {
        if bin.is_empty() || !bin.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        bin.parse().ok()
    }
}
