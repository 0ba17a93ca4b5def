//! In-memory BIN cache implementation.
//!
//! Single BINs live in a hash map; ranges are kept sorted by start for
//! O(log n) lookup with binary search.

use super::{cache_key, BinCache, BinRange, BIN_CACHE_KEY_LEN};
use crate::error::BinCacheError;
use std::collections::HashMap;

/// In-memory BIN cache with exact and range entries.
///
/// Keys are truncated to the cache's key length on both insert and lookup,
/// so an 8-digit BIN inserted into a 6-digit cache is stored under its first
/// six digits. Range bounds must be exactly key-length digits wide. Exact
/// entries take precedence over ranges; ranges are expected not to overlap.
///
/// # Example
///
/// ```
/// use cardcheck::cache::{BinCache, MemoryBinCache};
///
/// let cache = MemoryBinCache::from_entries([("123456", "testCard"), ("456789", "testCard")]).unwrap();
/// assert_eq!(cache.get("1234567891234567").as_deref(), Some("testCard"));
/// assert_eq!(cache.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MemoryBinCache {
    /// Single-BIN entries, keyed by the truncated BIN.
    exact: HashMap<String, String>,
    /// Range entries sorted by start.
    ranges: Vec<(BinRange, String)>,
    /// Number of leading digits that form a key.
    key_len: usize,
}

impl MemoryBinCache {
    /// Creates an empty cache keyed by [`BIN_CACHE_KEY_LEN`] digits.
    pub fn new() -> Self {
        Self::with_key_len(BIN_CACHE_KEY_LEN)
    }

    /// Creates an empty cache keyed by `key_len` digits.
    pub fn with_key_len(key_len: usize) -> Self {
        Self {
            exact: HashMap::new(),
            ranges: Vec::new(),
            key_len,
        }
    }

    /// Builds a cache from `(bin, card_type)` pairs.
    pub fn from_entries<B, T>(
        entries: impl IntoIterator<Item = (B, T)>,
    ) -> Result<Self, BinCacheError>
    where
        B: AsRef<str>,
        T: Into<String>,
    {
        let mut cache = Self::new();
        for (bin, card_type) in entries {
            cache.insert(bin.as_ref(), card_type)?;
        }
        Ok(cache)
    }

    /// Maps a single BIN to a card type, replacing any previous mapping.
    pub fn insert(&mut self, bin: &str, card_type: impl Into<String>) -> Result<(), BinCacheError> {
        if BinRange::parse_bin(bin).is_none() {
            return Err(BinCacheError::InvalidBin(bin.to_string()));
        }
        let key = cache_key(bin, self.key_len).to_string();
        self.exact.insert(key, card_type.into());
        Ok(())
    }

    /// Maps an inclusive range of BINs to a card type.
    pub fn insert_range(
        &mut self,
        start: &str,
        end: &str,
        card_type: impl Into<String>,
    ) -> Result<(), BinCacheError> {
        let start_num = self.parse_bound(start)?;
        let end_num = self.parse_bound(end)?;
        if end_num < start_num {
            return Err(BinCacheError::InvalidRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        let entry = (BinRange::new(start_num, end_num), card_type.into());
        let idx = self.ranges.partition_point(|(range, _)| *range <= entry.0);
        self.ranges.insert(idx, entry);
        Ok(())
    }

    fn parse_bound(&self, bound: &str) -> Result<u64, BinCacheError> {
        if bound.len() != self.key_len {
            return Err(BinCacheError::InvalidBin(bound.to_string()));
        }
        BinRange::parse_bin(bound).ok_or_else(|| BinCacheError::InvalidBin(bound.to_string()))
    }

    /// Removes a single-BIN mapping, returning its card type.
    pub fn remove(&mut self, bin: &str) -> Option<String> {
        self.exact.remove(cache_key(bin, self.key_len))
    }

    /// Looks up a range containing the key.
    fn lookup_range(&self, key: &str) -> Option<&str> {
        if key.len() != self.key_len {
            return None;
        }
        let bin = BinRange::parse_bin(key)?;

        self.ranges
            .binary_search_by(|(range, _)| {
                if range.contains(bin) {
                    std::cmp::Ordering::Equal
                } else if bin < range.start {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Less
                }
            })
            .ok()
            .map(|idx| self.ranges[idx].1.as_str())
    }

    fn lookup(&self, key: &str) -> Option<&str> {
        let key = cache_key(key, self.key_len);
        self.exact
            .get(key)
            .map(String::as_str)
            .or_else(|| self.lookup_range(key))
    }

    /// Returns the number of entries (single BINs plus ranges).
    pub fn len(&self) -> usize {
        self.exact.len() + self.ranges.len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears all entries.
    pub fn clear(&mut self) {
        self.exact.clear();
        self.ranges.clear();
    }
}

impl Default for MemoryBinCache {
    fn default() -> Self {
        Self::new()
    }
}

impl BinCache for MemoryBinCache {
    fn get(&self, key: &str) -> Option<String> {
        self.lookup(key).map(str::to_string)
    }

    fn has(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    fn key_len(&self) -> usize {
        self.key_len
    }
}
