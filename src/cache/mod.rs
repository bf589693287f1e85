//! # Score-Based Caching Layer
//!
//! This module implements a bounded in-memory cache whose eviction victim is
//! chosen by a weighted composite score instead of a fixed LRU/LFU/FIFO rule.
//!
//! ## Features
//!
//! - **Composite Scoring**: access frequency, recency, and three caller-supplied
//!   signals (ambient context, time of day, 2D location)
//! - **Pluggable Signals**: a [`ContextSignals`] implementation or a partial set
//!   of closures through [`ContextFunctions`]
//! - **Near-Tie Handling**: scores within [`TIE_TOLERANCE`] of the minimum form a
//!   tie group, and the most recently touched member of that group is evicted
//! - **Injectable Clock**: [`ManualClock`] gives tests exact control over recency
//!
//! ## Example
//!
//! ```rust
//! use ouroboros_cache::cache::{CacheConfig, ContextFunctions, ScoredCache, ScoringContext};
//!
//! # fn example() -> ouroboros_cache::Result<()> {
//! let config = CacheConfig::builder()
//!     .capacity(2)
//!     .alpha(2.0)
//!     .beta(3.0)
//!     .build();
//!
//! let mut cache: ScoredCache = ScoredCache::new(config)?;
//! cache.set_context_functions(
//!     ContextFunctions::new().time(|hour| if (8.0..=10.0).contains(&hour) { 2.0 } else { 0.5 }),
//! );
//!
//! let morning = ScoringContext::new().at(9.0);
//! cache.put("A".to_string(), "Apple".to_string(), &morning);
//!
//! if let Some(value) = cache.get("A") {
//!     println!("Cache hit: {}", value);
//! }
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod config;
pub mod entry;
pub mod score;
pub mod signals;
pub mod store;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CacheConfig, CacheConfigBuilder, ScoreWeights};
pub use entry::{CacheEntry, CacheMetadata};
pub use score::{RECENCY_EPSILON, TIE_TOLERANCE};
pub use signals::{ConstantSignals, ContextFunctions, ContextSignals, Location, ScoringContext};
pub use store::ScoredCache;
pub use types::{CacheKey, CacheStats, CacheValue};
