//! Demonstrates scored eviction on the three reference scenarios
//!
//! Run with:
//! ```bash
//! RUST_LOG=ouroboros_cache=debug cargo run --example scored_cache_demo
//! ```

use ouroboros_cache::{
    CacheConfig, ContextFunctions, ManualClock, ScoreWeights, ScoredCache, ScoringContext,
};
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

const SF: (f64, f64) = (37.77, -122.42);

fn build(weights: ScoreWeights, clock: &ManualClock) -> anyhow::Result<ScoredCache> {
    let config = CacheConfig::builder().capacity(2).weights(weights).build();
    Ok(ScoredCache::with_clock(config, clock.clone())?)
}

fn noon_signals() -> ContextFunctions {
    ContextFunctions::new()
        .context(|| 1.0)
        .time(|t| if t == 12.0 { 2.0 } else { 0.1 })
        .location(|x, y| if (x, y) == (0.0, 0.0) { 5.0 } else { 0.1 })
}

fn report(cache: &ScoredCache, expected: &[&str]) -> anyhow::Result<()> {
    let actual: HashSet<String> = cache.list_keys().into_iter().collect();
    let wanted: HashSet<String> = expected.iter().map(|s| s.to_string()).collect();

    println!("   Expected: {:?}", expected);
    println!("   Actual:   {:?}", cache.list_keys());
    println!("   {}", cache.stats());

    if actual != wanted {
        anyhow::bail!("expected keys {:?}, got {:?}", expected, cache.list_keys());
    }
    Ok(())
}

fn frequency_and_recency(clock: &ManualClock) -> anyhow::Result<()> {
    println!("\n1. Frequency + recency priority");
    let mut cache = build(ScoreWeights::new(2.0, 3.0, 1.0, 1.0, 1.0), clock)?;
    cache.set_context_functions(
        ContextFunctions::new()
            .context(|| 1.0)
            .time(|t| if (8.0..=10.0).contains(&t) { 2.0 } else { 0.5 })
            .location(|x, y| if (x, y) == SF { 2.0 } else { 0.5 }),
    );

    let sf = |hour: f64| ScoringContext::new().at(hour).located(SF.0, SF.1);
    cache.put("A".to_string(), "Apple".to_string(), &sf(9.0));
    clock.advance(Duration::from_millis(10));
    cache.put(
        "B".to_string(),
        "Banana".to_string(),
        &ScoringContext::new().at(22.0).located(40.71, -74.00),
    );
    cache.get("A");
    clock.advance(Duration::from_millis(10));
    cache.get("A");
    cache.put("C".to_string(), "Cherry".to_string(), &sf(10.0));

    report(&cache, &["A", "C"])
}

fn context_dominance(clock: &ManualClock) -> anyhow::Result<ScoredCache> {
    println!("\n2. Location/time weight dominance");
    let mut cache = build(ScoreWeights::new(1.0, 0.0, 1.0, 1.0, 1.0), clock)?;
    cache.set_context_functions(noon_signals());

    let noon = ScoringContext::new().at(12.0).located(0.0, 0.0);
    cache.put("X".to_string(), "Xray".to_string(), &noon);
    clock.advance(Duration::from_millis(50));
    cache.put(
        "Y".to_string(),
        "Yam".to_string(),
        &ScoringContext::new().at(1.0).located(99.0, 99.0),
    );
    clock.advance(Duration::from_millis(50));
    cache.put("Z".to_string(), "Zebra".to_string(), &noon);

    report(&cache, &["X", "Z"])?;
    Ok(cache)
}

fn tie_breaking(clock: &ManualClock, mut cache: ScoredCache) -> anyhow::Result<()> {
    println!("\n3. Tie-breaking on score");
    let noon = ScoringContext::new().at(12.0).located(0.0, 0.0);
    println!("   config: {}", serde_json::to_string(cache.config())?);

    clock.advance(Duration::from_millis(50));
    for (key, score) in cache.score_snapshot(&noon) {
        println!("   score({}) = {:.5}", key, score);
    }
    cache.put("W".to_string(), "Wing".to_string(), &noon);

    report(&cache, &["X", "W"])
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Ok(config) = CacheConfig::from_env() {
        info!("Environment cache config: {:?}", config);
    }

    println!("=== Scored Cache Demo ===");
    let started = Instant::now();
    let clock = ManualClock::default();

    frequency_and_recency(&clock)?;
    let cache = context_dominance(&clock)?;
    tie_breaking(&clock, cache)?;

    println!("\nRuntime: {:.6} seconds", started.elapsed().as_secs_f64());
    println!("✓ All scenarios passed");
    Ok(())
}
