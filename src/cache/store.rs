//! Main cache store implementation with score-based eviction

use crate::cache::{
    clock::{Clock, SystemClock},
    config::CacheConfig,
    entry::CacheEntry,
    score::{select_victim, weighted_score, Candidate, ScoreInputs},
    signals::{ContextFunctions, ContextSignals, Location, ScoringContext, SignalSlots},
    types::{CacheKey, CacheStats, CacheValue},
};
use crate::error::{CacheError, Result};
use chrono::{DateTime, Utc};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use tracing::{debug, info, trace};

/// Upper bound on slots reserved up front; larger caches grow on demand
const PREALLOCATE_LIMIT: usize = 1024;

/// Bounded cache that evicts the entry with the lowest composite score
///
/// This implementation provides:
/// - A fixed capacity checked only when a new key is inserted
/// - Frequency and recency bookkeeping on every `get` and `put`
/// - Caller-supplied context, time and location signals
/// - Deterministic scan order (first insertion order of keys)
///
/// The cache is single-threaded; hosts that share it across threads must
/// wrap the whole value in one lock.
pub struct ScoredCache<K = CacheKey, V = CacheValue> {
    /// Cache configuration
    config: CacheConfig,

    /// Main storage: key -> entry
    entries: HashMap<K, CacheEntry<V>>,

    /// Keys in first insertion order, used as the eviction scan order
    order: Vec<K>,

    /// Context, time and location signals, one slot each
    signals: SignalSlots,

    /// Source of access timestamps
    clock: Box<dyn Clock>,

    /// Usage counters
    stats: CacheStats,
}

impl<K, V> ScoredCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    /// Create a new cache reading the system clock
    pub fn new(config: CacheConfig) -> Result<Self> {
        Self::with_clock(config, SystemClock)
    }

    /// Create a cache with the given capacity and unit weights
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::new(CacheConfig::with_capacity(capacity))
    }

    /// Create a cache driven by a custom clock
    pub fn with_clock<C>(config: CacheConfig, clock: C) -> Result<Self>
    where
        C: Clock + 'static,
    {
        config.validate()?;
        info!(
            "Initializing scored cache: capacity={}, weights={:?}",
            config.capacity, config.weights
        );

        let reserve = config.capacity.min(PREALLOCATE_LIMIT);
        Ok(Self {
            entries: HashMap::with_capacity(reserve),
            order: Vec::with_capacity(reserve),
            config,
            signals: SignalSlots::default(),
            clock: Box::new(clock),
            stats: CacheStats::default(),
        })
    }

    /// Replace all three scoring signals
    pub fn set_signals<S>(&mut self, signals: S)
    where
        S: ContextSignals + 'static,
    {
        debug!("Replacing all context signals");
        self.signals = SignalSlots::from_signals(signals);
    }

    /// Replace any subset of the scoring signals
    ///
    /// Signals without a closure in `functions` keep their current behaviour.
    pub fn set_context_functions(&mut self, functions: ContextFunctions) {
        debug!("Updating context functions: {:?}", functions);
        self.signals.apply(functions);
    }

    /// Score an entry under `ctx` at the current time
    ///
    /// Fails with [`CacheError::KeyNotFound`] when the key is absent.
    pub fn compute_score<Q>(&self, key: &Q, ctx: &ScoringContext) -> Result<f64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        let entry = self
            .entries
            .get(key)
            .ok_or_else(|| CacheError::key_not_found(key))?;

        let now = self.clock.now();
        let (hint, location) = self.resolve(ctx, now);
        Ok(self.score_entry(entry, now, hint, location))
    }

    /// Get a value, recording the access
    ///
    /// A hit raises the key's frequency and refreshes its last access time.
    /// A miss leaves every entry untouched. No score is computed here, so
    /// unlike `put` and `evict` there is no time hint or location to pass.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        let now = self.clock.now();

        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.mark_accessed(now);
                self.stats.hits += 1;
                debug!("Cache hit: {:?}", key);
                Some(&entry.value)
            }
            None => {
                self.stats.misses += 1;
                debug!("Cache miss: {:?}", key);
                None
            }
        }
    }

    /// Insert or update a value
    ///
    /// A new key arriving at a full cache first evicts one entry, scored
    /// under this call's `ctx`. Updating an existing key never evicts.
    pub fn put(&mut self, key: K, value: V, ctx: &ScoringContext) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.config.capacity {
            self.evict(ctx);
        }

        let now = self.clock.now();

        if let Some(entry) = self.entries.get_mut(&key) {
            debug!("Updating existing cache entry: {:?}", key);
            entry.replace_value(value, now);
            entry.mark_accessed(now);
            self.stats.updates += 1;
        } else {
            debug!("Inserting new cache entry: {:?}", key);
            let mut entry = CacheEntry::new(value, now);
            entry.mark_accessed(now);
            self.entries.insert(key.clone(), entry);
            self.order.push(key);
            self.stats.inserts += 1;
        }

        self.stats.entries = self.entries.len();
    }

    /// Evict the lowest-scoring entry under `ctx`
    ///
    /// Returns the evicted key, or `None` when the cache is empty.
    pub fn evict(&mut self, ctx: &ScoringContext) -> Option<K> {
        let now = self.clock.now();
        let (hint, location) = self.resolve(ctx, now);

        let candidates = self.order.iter().filter_map(|key| {
            let entry = self.entries.get(key)?;
            let score = self.score_entry(entry, now, hint, location);
            trace!("Eviction candidate {:?}: score={}", key, score);
            Some(Candidate {
                key: key.clone(),
                score,
                last_access: entry.metadata.accessed_at,
            })
        });

        let victim = select_victim(candidates)?;
        self.detach(&victim.key);
        self.stats.evictions += 1;
        self.stats.entries = self.entries.len();

        debug!(
            "Evicted {:?} (score={}, tied={})",
            victim.key, victim.min_score, victim.tied
        );
        Some(victim.key)
    }

    /// Keys currently present, in first insertion order
    pub fn list_keys(&self) -> Vec<K> {
        self.order.clone()
    }

    /// Score every entry under `ctx`, in scan order
    pub fn score_snapshot(&self, ctx: &ScoringContext) -> Vec<(K, f64)> {
        let now = self.clock.now();
        let (hint, location) = self.resolve(ctx, now);

        self.order
            .iter()
            .filter_map(|key| {
                let entry = self.entries.get(key)?;
                Some((key.clone(), self.score_entry(entry, now, hint, location)))
            })
            .collect()
    }

    /// Remove a specific entry from the cache
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        let value = self.detach(key)?;
        self.stats.removals += 1;
        self.stats.entries = self.entries.len();

        debug!("Removed cache entry: {:?}", key);
        Some(value)
    }

    /// Clear all entries from the cache
    pub fn clear(&mut self) {
        let count = self.entries.len();
        self.entries.clear();
        self.order.clear();
        self.stats.removals += count as u64;
        self.stats.entries = 0;

        info!("Cleared {} entries from cache", count);
    }

    /// Check if a key exists without recording an access
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    /// Read a value without recording an access
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key).map(|entry| &entry.value)
    }

    /// Entry with its metadata, without recording an access
    pub fn entry<Q>(&self, key: &Q) -> Option<&CacheEntry<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key)
    }

    /// Access count of a present key
    pub fn access_frequency<Q>(&self, key: &Q) -> Result<u64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        self.entries
            .get(key)
            .map(|entry| entry.metadata.access_count)
            .ok_or_else(|| CacheError::key_not_found(key))
    }

    /// Last access time of a present key
    pub fn last_access<Q>(&self, key: &Q) -> Result<DateTime<Utc>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        self.entries
            .get(key)
            .map(|entry| entry.metadata.accessed_at)
            .ok_or_else(|| CacheError::key_not_found(key))
    }

    /// Get number of entries in cache
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    /// Internal: effective time hint and location for a call
    fn resolve(&self, ctx: &ScoringContext, now: DateTime<Utc>) -> (f64, Location) {
        let hint = ctx.hint.unwrap_or_else(|| self.clock.hour_of(now));
        (hint, ctx.location.unwrap_or(Location::ORIGIN))
    }

    /// Internal: score one entry
    fn score_entry(
        &self,
        entry: &CacheEntry<V>,
        now: DateTime<Utc>,
        hint: f64,
        location: Location,
    ) -> f64 {
        let inputs = ScoreInputs {
            frequency: entry.metadata.access_count,
            recency_secs: entry.recency(now),
            context: self.signals.context_value(),
            time: self.signals.time_weight(hint),
            location: self.signals.location_weight(location.x, location.y),
        };
        weighted_score(&self.config.weights, &inputs)
    }

    /// Internal: drop an entry and its scan slot together
    fn detach<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let entry = self.entries.remove(key)?;
        self.order.retain(|k| k.borrow() != key);
        Some(entry.value)
    }
}

impl<K, V> fmt::Debug for ScoredCache<K, V>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoredCache")
            .field("config", &self.config)
            .field("keys", &self.order)
            .field("stats", &self.stats)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::clock::ManualClock;
    use crate::cache::config::ScoreWeights;
    use chrono::TimeZone;
    use std::time::Duration;

    fn clock() -> ManualClock {
        ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap())
    }

    fn cache_with(
        capacity: usize,
        weights: ScoreWeights,
        clock: &ManualClock,
    ) -> ScoredCache<String, String> {
        let config = CacheConfig::builder()
            .capacity(capacity)
            .weights(weights)
            .build();
        ScoredCache::with_clock(config, clock.clone()).unwrap()
    }

    #[test]
    fn test_basic_put_and_get() {
        let clock = clock();
        let mut cache = cache_with(4, ScoreWeights::default(), &clock);

        cache.put("key1".to_string(), "value1".to_string(), &ScoringContext::new());
        assert_eq!(cache.access_frequency("key1").unwrap(), 1);

        let value = cache.get("key1").cloned();
        assert_eq!(value, Some("value1".to_string()));
        assert_eq!(cache.access_frequency("key1").unwrap(), 2);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.inserts, 1);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn test_cache_miss_does_not_mutate() {
        let clock = clock();
        let mut cache = cache_with(2, ScoreWeights::default(), &clock);
        cache.put("a".to_string(), "1".to_string(), &ScoringContext::new());
        let before = cache.entry("a").cloned();

        clock.advance(Duration::from_secs(1));
        assert!(cache.get("missing").is_none());
        assert!(cache.get("missing").is_none());

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.entry("a").cloned(), before);
        assert_eq!(cache.stats().misses, 2);
    }

    #[test]
    fn test_get_refreshes_last_access() {
        let clock = clock();
        let mut cache = cache_with(2, ScoreWeights::default(), &clock);
        cache.put("a".to_string(), "1".to_string(), &ScoringContext::new());

        clock.advance(Duration::from_millis(30));
        cache.get("a");

        assert_eq!(cache.last_access("a").unwrap(), clock.now());
        assert_eq!(
            cache.entry("a").unwrap().metadata.stored_at,
            clock.now() - chrono::Duration::milliseconds(30)
        );
    }

    #[test]
    fn test_update_does_not_evict() {
        let clock = clock();
        let mut cache = cache_with(2, ScoreWeights::default(), &clock);
        let ctx = ScoringContext::new();

        cache.put("a".to_string(), "1".to_string(), &ctx);
        cache.put("b".to_string(), "2".to_string(), &ctx);
        clock.advance(Duration::from_millis(5));
        cache.put("a".to_string(), "3".to_string(), &ctx);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.peek("a"), Some(&"3".to_string()));
        assert_eq!(cache.access_frequency("a").unwrap(), 2);
        assert_eq!(cache.entry("a").unwrap().metadata.stored_at, clock.now());
        assert_eq!(cache.stats().evictions, 0);
        assert_eq!(cache.stats().updates, 1);
        assert_eq!(cache.list_keys(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_new_key_at_capacity_evicts_one() {
        let clock = clock();
        let mut cache = cache_with(2, ScoreWeights::new(1.0, 0.0, 0.0, 0.0, 0.0), &clock);
        let ctx = ScoringContext::new();

        cache.put("a".to_string(), "1".to_string(), &ctx);
        cache.put("b".to_string(), "2".to_string(), &ctx);
        cache.get("a");
        cache.put("c".to_string(), "3".to_string(), &ctx);

        assert_eq!(cache.len(), 2);
        assert!(!cache.contains_key("b"));
        assert_eq!(cache.list_keys(), vec!["a".to_string(), "c".to_string()]);
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_evict_empty_is_noop() {
        let clock = clock();
        let mut cache: ScoredCache = cache_with(1, ScoreWeights::default(), &clock);

        assert_eq!(cache.evict(&ScoringContext::new()), None);
        assert_eq!(cache.stats().evictions, 0);
    }

    #[test]
    fn test_evict_removes_exactly_one() {
        let clock = clock();
        let mut cache = cache_with(3, ScoreWeights::default(), &clock);
        let ctx = ScoringContext::new();
        for key in ["a", "b", "c"] {
            cache.put(key.to_string(), key.to_uppercase(), &ctx);
            clock.advance(Duration::from_millis(10));
        }

        // "a" has been idle longest and has the smallest recency bonus
        assert_eq!(cache.evict(&ctx), Some("a".to_string()));
        assert_eq!(cache.len(), 2);
        assert!(cache.access_frequency("a").is_err());
        assert!(cache.last_access("a").is_err());
    }

    #[test]
    fn test_compute_score_formula() {
        let clock = clock();
        let mut cache = cache_with(2, ScoreWeights::new(2.0, 3.0, 1.0, 1.0, 1.0), &clock);
        cache.set_context_functions(
            ContextFunctions::new()
                .context(|| 0.5)
                .time(|t| t / 10.0)
                .location(|x, y| x - y),
        );
        cache.put("a".to_string(), "1".to_string(), &ScoringContext::new());
        clock.advance(Duration::from_millis(500));

        let ctx = ScoringContext::new().at(8.0).located(3.0, 1.0);
        let score = cache.compute_score("a", &ctx).unwrap();
        let expected = 2.0 * 1.0 + 3.0 / (0.5 + 1e-5) + 0.5 + 0.8 + 2.0;

        assert!((score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_compute_score_defaults_to_origin() {
        let clock = clock();
        let mut cache = cache_with(2, ScoreWeights::new(0.0, 0.0, 0.0, 0.0, 1.0), &clock);
        cache.set_context_functions(
            ContextFunctions::new().location(|x, y| if x == 0.0 && y == 0.0 { 4.0 } else { 0.0 }),
        );
        cache.put("a".to_string(), "1".to_string(), &ScoringContext::new());

        assert_eq!(cache.compute_score("a", &ScoringContext::new()).unwrap(), 4.0);
    }

    #[test]
    fn test_compute_score_missing_key() {
        let clock = clock();
        let cache: ScoredCache = cache_with(2, ScoreWeights::default(), &clock);

        let result = cache.compute_score("ghost", &ScoringContext::new());
        assert!(matches!(result, Err(CacheError::KeyNotFound { .. })));
    }

    #[test]
    fn test_invalid_capacity_rejected() {
        let result: Result<ScoredCache> = ScoredCache::with_capacity(0);
        assert!(matches!(result, Err(CacheError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_remove_and_clear() {
        let clock = clock();
        let mut cache = cache_with(3, ScoreWeights::default(), &clock);
        let ctx = ScoringContext::new();
        cache.put("a".to_string(), "1".to_string(), &ctx);
        cache.put("b".to_string(), "2".to_string(), &ctx);

        assert_eq!(cache.remove("a"), Some("1".to_string()));
        assert_eq!(cache.remove("a"), None);
        assert_eq!(cache.list_keys(), vec!["b".to_string()]);

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.list_keys().is_empty());
        assert_eq!(cache.stats().removals, 2);
    }

    #[test]
    fn test_set_signals_replaces_all() {
        struct Half;

        impl ContextSignals for Half {
            fn context_value(&self) -> f64 {
                0.5
            }
            fn time_weight(&self, _hint: f64) -> f64 {
                0.5
            }
            fn location_weight(&self, _x: f64, _y: f64) -> f64 {
                0.5
            }
        }

        let clock = clock();
        let mut cache = cache_with(2, ScoreWeights::new(0.0, 0.0, 1.0, 1.0, 1.0), &clock);
        cache.put("a".to_string(), "1".to_string(), &ScoringContext::new());
        let ctx = ScoringContext::new().at(1.0);

        assert_eq!(cache.compute_score("a", &ctx).unwrap(), 3.0);
        cache.set_signals(Half);
        assert_eq!(cache.compute_score("a", &ctx).unwrap(), 1.5);
        cache.set_context_functions(ContextFunctions::new().context(|| 2.0));
        assert_eq!(cache.compute_score("a", &ctx).unwrap(), 3.0);
    }

    #[test]
    fn test_score_snapshot_order() {
        let clock = clock();
        let mut cache = cache_with(3, ScoreWeights::new(1.0, 0.0, 0.0, 0.0, 0.0), &clock);
        let ctx = ScoringContext::new();
        cache.put("b".to_string(), "1".to_string(), &ctx);
        cache.put("a".to_string(), "2".to_string(), &ctx);
        cache.get("a");

        let snapshot = cache.score_snapshot(&ctx);
        assert_eq!(
            snapshot,
            vec![("b".to_string(), 1.0), ("a".to_string(), 2.0)]
        );
    }
}
