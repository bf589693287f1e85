//! # Ouroboros Cache (ouroboros-cache)
//!
//! A bounded in-memory key-value cache that picks eviction victims with a
//! weighted, context-aware score.
//!
//! ## Features
//!
//! - Fixed capacity, one eviction per new key at a full cache
//! - Score blends frequency, recency, ambient context, time of day and location
//! - Caller-injected signal callbacks, constant 1.0 by default
//! - Deterministic tie-break among near-equal minimum scores
//! - Injectable clock for reproducible tests
//! - Configuration from code, presets, or `SCORED_CACHE_*` environment variables
//!
//! ## Scoring
//!
//! ```text
//! score = alpha * frequency
//!       + beta  * 1 / (seconds_since_last_access + 1e-5)
//!       + gamma * context()
//!       + delta * time(hint or local hour)
//!       + epsilon * location(x, y or 0.0, 0.0)
//! ```
//!
//! Higher scores are kept. Among entries whose scores lie within `1e-5` of the
//! minimum, the one accessed most recently is evicted.
//!
//! ## Example
//!
//! ```rust
//! use ouroboros_cache::{CacheConfig, ContextFunctions, ScoredCache, ScoringContext};
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut cache: ScoredCache = ScoredCache::new(CacheConfig::context_driven(2))?;
//!     cache.set_context_functions(
//!         ContextFunctions::new()
//!             .time(|t| if t == 12.0 { 2.0 } else { 0.1 })
//!             .location(|x, y| if (x, y) == (0.0, 0.0) { 5.0 } else { 0.1 }),
//!     );
//!
//!     let noon = ScoringContext::new().at(12.0).located(0.0, 0.0);
//!     cache.put("X".to_string(), "Xray".to_string(), &noon);
//!     cache.put("Y".to_string(), "Yam".to_string(), &ScoringContext::new().at(1.0).located(99.0, 99.0));
//!     cache.put("Z".to_string(), "Zebra".to_string(), &noon);
//!
//!     assert_eq!(cache.len(), 2);
//!     assert!(cache.contains_key("Z"));
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod error;

// Re-export main types for convenience
pub use cache::{
    CacheConfig, CacheConfigBuilder, CacheEntry, CacheKey, CacheMetadata, CacheStats, CacheValue,
    Clock, ConstantSignals, ContextFunctions, ContextSignals, Location, ManualClock, ScoreWeights,
    ScoredCache, ScoringContext, SystemClock, RECENCY_EPSILON, TIE_TOLERANCE,
};
pub use error::{CacheError, Result};
