//! Error types for cache operations
//!
//! Absence of a key on `get` is a normal outcome and is reported as `None`.
//! The variants here cover direct lookups that require presence and
//! configurations the engine refuses to run with.

use thiserror::Error;

/// Main error type for cache operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CacheError {
    /// A lookup that requires the key to be present did not find it
    #[error("Key not found: {key}")]
    KeyNotFound { key: String },

    /// Capacity or weights rejected at construction
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Generic error with context
    #[error("Error: {0}")]
    Other(String),
}

impl CacheError {
    /// Build a `KeyNotFound` from any debuggable key
    pub fn key_not_found<K: std::fmt::Debug + ?Sized>(key: &K) -> Self {
        CacheError::KeyNotFound {
            key: format!("{:?}", key),
        }
    }
}

/// Result type alias for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;

impl From<String> for CacheError {
    fn from(s: String) -> Self {
        CacheError::Other(s)
    }
}

impl From<&str> for CacheError {
    fn from(s: &str) -> Self {
        CacheError::Other(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = CacheError::key_not_found("missing");
        assert_eq!(error.to_string(), "Key not found: \"missing\"");

        let error = CacheError::InvalidConfiguration("capacity must be greater than 0".to_string());
        assert!(error.to_string().contains("capacity must be greater than 0"));
    }

    #[test]
    fn test_error_conversion() {
        let error: CacheError = "test error".into();
        assert!(matches!(error, CacheError::Other(_)));

        let error: CacheError = "test error".to_string().into();
        assert!(matches!(error, CacheError::Other(_)));
    }
}
