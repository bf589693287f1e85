//! Core type definitions for the cache system

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default key type for string-keyed caches
pub type CacheKey = String;

/// Default value type for string-valued caches
pub type CacheValue = String;

/// Counters describing how the cache has been used
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// `get` calls that found the key
    pub hits: u64,

    /// `get` calls that did not find the key
    pub misses: u64,

    /// `put` calls that created a new entry
    pub inserts: u64,

    /// `put` calls that replaced the value of an existing entry
    pub updates: u64,

    /// Entries removed by the scoring policy
    pub evictions: u64,

    /// Entries removed explicitly through `remove` or `clear`
    pub removals: u64,

    /// Number of entries currently in cache
    pub entries: usize,
}

impl CacheStats {
    /// Calculate cache hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }

    /// Calculate miss rate as a percentage
    pub fn miss_rate(&self) -> f64 {
        100.0 - self.hit_rate()
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CacheStats {{ hits: {}, misses: {}, hit_rate: {:.2}%, entries: {}, inserts: {}, updates: {}, evictions: {}, removals: {} }}",
            self.hits,
            self.misses,
            self.hit_rate(),
            self.entries,
            self.inserts,
            self.updates,
            self.evictions,
            self.removals
        )
    }
}
