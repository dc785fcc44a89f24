//! Cache error types.
//!
//! These errors never cross the repository boundary: the caching layer
//! logs and swallows them, degrading to a miss or no-op.

use redis::RedisError;

/// Cache-related errors
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
