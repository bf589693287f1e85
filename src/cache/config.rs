//! Configuration for the scored cache

use crate::error::{CacheError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Environment variable prefix used by [`CacheConfig::from_env`]
pub const ENV_PREFIX: &str = "SCORED_CACHE_";

/// Weight coefficients applied to the five score terms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Access frequency weight
    pub alpha: f64,

    /// Recency weight (recently touched entries score higher)
    pub beta: f64,

    /// Ambient context weight
    pub gamma: f64,

    /// Time-of-day weight
    pub delta: f64,

    /// Location weight
    pub epsilon: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            beta: 1.0,
            gamma: 1.0,
            delta: 1.0,
            epsilon: 1.0,
        }
    }
}

impl ScoreWeights {
    /// Create weights from the five coefficients in formula order
    pub fn new(alpha: f64, beta: f64, gamma: f64, delta: f64, epsilon: f64) -> Self {
        Self {
            alpha,
            beta,
            gamma,
            delta,
            epsilon,
        }
    }

    fn named(&self) -> [(&'static str, f64); 5] {
        [
            ("alpha", self.alpha),
            ("beta", self.beta),
            ("gamma", self.gamma),
            ("delta", self.delta),
            ("epsilon", self.epsilon),
        ]
    }

    /// Validate the weights: each must be finite and non-negative
    pub fn validate(&self) -> Result<()> {
        for (name, weight) in self.named() {
            if !weight.is_finite() {
                return Err(CacheError::InvalidConfiguration(format!(
                    "{} must be a finite number, got {}",
                    name, weight
                )));
            }
            if weight < 0.0 {
                return Err(CacheError::InvalidConfiguration(format!(
                    "{} must not be negative, got {}",
                    name, weight
                )));
            }
        }
        Ok(())
    }
}

/// Configuration for the scored cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of distinct keys held at once
    pub capacity: usize,

    /// Score term coefficients
    pub weights: ScoreWeights,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 128,
            weights: ScoreWeights::default(),
        }
    }
}

impl CacheConfig {
    /// Create a configuration with the given capacity and unit weights
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    /// Create a new builder for cache configuration
    pub fn builder() -> CacheConfigBuilder {
        CacheConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CacheError::InvalidConfiguration(
                "capacity must be greater than 0".to_string(),
            ));
        }

        self.weights.validate()
    }

    /// Load configuration from the process environment
    ///
    /// A `.env` file in the working directory is read first if present.
    /// Recognised variables are `SCORED_CACHE_CAPACITY` and
    /// `SCORED_CACHE_{ALPHA,BETA,GAMMA,DELTA,EPSILON}`; anything unset keeps
    /// its default.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let read = |suffix: &str| lookup(&format!("{}{}", ENV_PREFIX, suffix));

        let config = Self {
            capacity: parse_var(read("CAPACITY"), "CAPACITY", defaults.capacity)?,
            weights: ScoreWeights {
                alpha: parse_var(read("ALPHA"), "ALPHA", defaults.weights.alpha)?,
                beta: parse_var(read("BETA"), "BETA", defaults.weights.beta)?,
                gamma: parse_var(read("GAMMA"), "GAMMA", defaults.weights.gamma)?,
                delta: parse_var(read("DELTA"), "DELTA", defaults.weights.delta)?,
                epsilon: parse_var(read("EPSILON"), "EPSILON", defaults.weights.epsilon)?,
            },
        };

        config.validate()?;
        Ok(config)
    }
}

fn parse_var<T: FromStr>(raw: Option<String>, suffix: &str, default: T) -> Result<T> {
    match raw {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| {
            CacheError::InvalidConfiguration(format!(
                "{}{} has an invalid value: {:?}",
                ENV_PREFIX, suffix, raw
            ))
        }),
    }
}

/// Builder for cache configuration
#[derive(Debug, Default)]
pub struct CacheConfigBuilder {
    capacity: Option<usize>,
    alpha: Option<f64>,
    beta: Option<f64>,
    gamma: Option<f64>,
    delta: Option<f64>,
    epsilon: Option<f64>,
}

impl CacheConfigBuilder {
    /// Set maximum number of cache entries
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Set frequency weight
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    /// Set recency weight
    pub fn beta(mut self, beta: f64) -> Self {
        self.beta = Some(beta);
        self
    }

    /// Set context weight
    pub fn gamma(mut self, gamma: f64) -> Self {
        self.gamma = Some(gamma);
        self
    }

    /// Set time-of-day weight
    pub fn delta(mut self, delta: f64) -> Self {
        self.delta = Some(delta);
        self
    }

    /// Set location weight
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = Some(epsilon);
        self
    }

    /// Set all five weights at once
    pub fn weights(self, weights: ScoreWeights) -> Self {
        self.alpha(weights.alpha)
            .beta(weights.beta)
            .gamma(weights.gamma)
            .delta(weights.delta)
            .epsilon(weights.epsilon)
    }

    /// Build the cache configuration
    pub fn build(self) -> CacheConfig {
        let defaults = CacheConfig::default();

        CacheConfig {
            capacity: self.capacity.unwrap_or(defaults.capacity),
            weights: ScoreWeights {
                alpha: self.alpha.unwrap_or(defaults.weights.alpha),
                beta: self.beta.unwrap_or(defaults.weights.beta),
                gamma: self.gamma.unwrap_or(defaults.weights.gamma),
                delta: self.delta.unwrap_or(defaults.weights.delta),
                epsilon: self.epsilon.unwrap_or(defaults.weights.epsilon),
            },
        }
    }
}

/// Preset configurations for common use cases
impl CacheConfig {
    /// Rank purely by access count (LFU-like)
    pub fn frequency_only(capacity: usize) -> Self {
        Self {
            capacity,
            weights: ScoreWeights::new(1.0, 0.0, 0.0, 0.0, 0.0),
        }
    }

    /// Rank purely by idle time (LRU-like)
    pub fn recency_only(capacity: usize) -> Self {
        Self {
            capacity,
            weights: ScoreWeights::new(0.0, 1.0, 0.0, 0.0, 0.0),
        }
    }

    /// Frequency plus the three context signals, recency ignored
    pub fn context_driven(capacity: usize) -> Self {
        Self {
            capacity,
            weights: ScoreWeights::new(1.0, 0.0, 1.0, 1.0, 1.0),
        }
    }
}
