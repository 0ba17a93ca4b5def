//! JSON BIN cache loader.
//!
//! Requires the `json` feature. The accepted layout is
//!
//! ```json
//! {
//!   "bins": { "123456": "testCard", "456789": "testCard" },
//!   "ranges": [ { "start": "400000", "end": "400099", "type": "visa" } ]
//! }
//! ```
//!
//! Both keys are optional.

use super::MemoryBinCache;
use crate::error::BinCacheError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct JsonBinFile {
    #[serde(default)]
    bins: BTreeMap<String, String>,
    #[serde(default)]
    ranges: Vec<JsonBinRange>,
}

#[derive(Debug, Deserialize)]
struct JsonBinRange {
    start: String,
    end: String,
    #[serde(rename = "type")]
    card_type: String,
}

impl MemoryBinCache {
    /// Loads a cache from a JSON string.
    ///
    /// # Example
    ///
    /// ```
    /// use cardcheck::cache::{BinCache, MemoryBinCache};
    ///
    /// let cache = MemoryBinCache::from_json_str(r#"{"bins": {"123456": "testCard"}}"#).unwrap();
    /// assert!(cache.has("123456"));
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, BinCacheError> {
        let file: JsonBinFile = serde_json::from_str(json)?;

        let mut cache = Self::new();
        for (bin, card_type) in file.bins {
            cache.insert(&bin, card_type)?;
        }
        for range in file.ranges {
            cache.insert_range(&range.start, &range.end, range.card_type)?;
        }

        tracing::debug!(entries = cache.len(), "loaded BIN cache");
        Ok(cache)
    }

    /// Loads a cache from a reader.
    pub fn from_json_reader<R: Read>(mut reader: R) -> Result<Self, BinCacheError> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Self::from_json_str(&content)
    }

    /// Loads a cache from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, BinCacheError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}
