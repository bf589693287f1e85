//! Cache entry with access bookkeeping

use crate::cache::clock::seconds_between;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored value together with the metadata the score is computed from
///
/// Value, frequency and last access live in one struct so that inserting
/// or removing a key always moves all three together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<V> {
    /// The cached value
    pub value: V,

    /// Entry metadata
    pub metadata: CacheMetadata,
}

/// Metadata associated with a cache entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheMetadata {
    /// When the current value was stored (insert or update)
    pub stored_at: DateTime<Utc>,

    /// Last `get` or `put` touching this key
    pub accessed_at: DateTime<Utc>,

    /// Number of `get` and `put` calls that touched this key
    pub access_count: u64,
}

impl<V> CacheEntry<V> {
    /// Create an entry that has not been accessed yet
    ///
    /// The caller records the storing `put` through [`CacheEntry::mark_accessed`].
    pub fn new(value: V, now: DateTime<Utc>) -> Self {
        Self {
            value,
            metadata: CacheMetadata {
                stored_at: now,
                accessed_at: now,
                access_count: 0,
            },
        }
    }

    /// Record an access at `now`
    pub fn mark_accessed(&mut self, now: DateTime<Utc>) {
        self.metadata.accessed_at = now;
        self.metadata.access_count += 1;
    }

    /// Replace the value, returning the previous one
    pub fn replace_value(&mut self, value: V, now: DateTime<Utc>) -> V {
        self.metadata.stored_at = now;
        std::mem::replace(&mut self.value, value)
    }

    /// Seconds since the last access
    pub fn recency(&self, now: DateTime<Utc>) -> f64 {
        seconds_between(self.metadata.accessed_at, now)
    }
}
