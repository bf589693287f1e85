//! Composite eviction score and victim selection
//!
//! ```text
//! score = alpha   * frequency
//!       + beta    * 1 / (recency + RECENCY_EPSILON)
//!       + gamma   * context
//!       + delta   * time_weight(hint)
//!       + epsilon * location_weight(x, y)
//! ```
//!
//! Higher is more valuable. The victim is the lowest scorer; scores within
//! [`TIE_TOLERANCE`] of the minimum form a tie group, and the group member
//! touched most recently is evicted.

use crate::cache::config::ScoreWeights;
use chrono::{DateTime, Utc};

/// Added to recency before taking the reciprocal; caps the recency bonus near 1e5
pub const RECENCY_EPSILON: f64 = 1e-5;

/// Absolute distance under which two scores count as tied
pub const TIE_TOLERANCE: f64 = 1e-5;

/// Raw term values for one entry at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreInputs {
    /// Access count
    pub frequency: u64,
    /// Seconds since the last access
    pub recency_secs: f64,
    /// Ambient context signal
    pub context: f64,
    /// Time signal for the effective hint
    pub time: f64,
    /// Location signal for the effective location
    pub location: f64,
}

/// Weighted sum of the five terms
pub fn weighted_score(weights: &ScoreWeights, inputs: &ScoreInputs) -> f64 {
    weights.alpha * inputs.frequency as f64
        + weights.beta * (1.0 / (inputs.recency_secs + RECENCY_EPSILON))
        + weights.gamma * inputs.context
        + weights.delta * inputs.time
        + weights.epsilon * inputs.location
}

/// One scored key considered during an eviction scan
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<K> {
    pub key: K,
    pub score: f64,
    pub last_access: DateTime<Utc>,
}

/// Outcome of an eviction scan
#[derive(Debug, Clone, PartialEq)]
pub struct Victim<K> {
    pub key: K,
    /// Minimum score seen during the scan
    pub min_score: f64,
    /// Number of candidates in the tie group, victim included
    pub tied: usize,
}

/// Pick the entry to evict from candidates in scan order
///
/// A score strictly below the running minimum restarts the tie group; a
/// score within [`TIE_TOLERANCE`] of it joins the group. NaN scores rank as
/// negative infinity. Among equal `last_access` values the earliest-scanned
/// candidate is chosen.
pub fn select_victim<K, I>(candidates: I) -> Option<Victim<K>>
where
    I: IntoIterator<Item = Candidate<K>>,
{
    let mut min_score: Option<f64> = None;
    let mut tied: Vec<Candidate<K>> = Vec::new();

    for mut candidate in candidates {
        if candidate.score.is_nan() {
            candidate.score = f64::NEG_INFINITY;
        }

        match min_score {
            Some(min) if candidate.score >= min => {
                if (candidate.score - min).abs() < TIE_TOLERANCE {
                    tied.push(candidate);
                }
            }
            _ => {
                min_score = Some(candidate.score);
                tied.clear();
                tied.push(candidate);
            }
        }
    }

    let min_score = min_score?;
    let count = tied.len();
    let mut group = tied.into_iter();
    let mut newest = group.next()?;
    for candidate in group {
        if candidate.last_access > newest.last_access {
            newest = candidate;
        }
    }

    Some(Victim {
        key: newest.key,
        min_score,
        tied: count,
    })
}
