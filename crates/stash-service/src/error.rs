//! Service layer error types.

use stash_auth::AuthError;
use stash_cache::CacheError;
use stash_core::CoreError;
use stash_storage::StorageError;

/// Errors surfaced by the record service and startup wiring.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The request payload violates a record invariant.
    #[error(transparent)]
    InvalidRecord(#[from] CoreError),

    /// The backing store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The distributed cache could not be reached during wiring.
    ///
    /// Cache faults after startup are swallowed by the caching
    /// repository; only the initial connection is fatal.
    #[error("Failed to connect distributed cache: {0}")]
    CacheConnect(#[from] CacheError),

    /// Auth service construction failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The document-database backend was selected but no collection
    /// handle was supplied.
    #[error("Storage backend 'document-db' requires a document collection")]
    MissingCollection,

    /// The distributed cache was enabled without a connection URL.
    #[error("use_distributed_cache requires cache.redis_url")]
    MissingRedisUrl,
}

/// Result type for service operations.
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
