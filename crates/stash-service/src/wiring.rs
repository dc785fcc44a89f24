//! Startup wiring: configuration into constructed services.
//!
//! The backend choice is resolved exactly once, here. Everything
//! downstream holds a `DynRecordStore` and never consults configuration
//! again.

use std::sync::Arc;

use stash_auth::{AuthService, JwtConfig, JwtService};
use stash_cache::{CachedRecordStore, DynCacheTier, FileCache, MemoryCache, RedisCache};
use stash_config::{CacheSettings, StashConfig, TokenSettings};
use stash_db_document::{DocumentRecordStore, DynDocumentCollection};
use stash_db_memory::InMemoryRecordStore;
use stash_storage::{DynRecordStore, DynUserStore, StorageBackend};
use tracing::info;

use crate::error::{ServiceError, ServiceResult};

/// Entry cap for the in-process primary cache.
const PRIMARY_CACHE_CAPACITY: u64 = 10_000;

/// Builds the fully layered record store from configuration.
///
/// The backend of record comes from `storage.backend`; the document
/// backend additionally needs a `collection` handle from the caller,
/// since driver setup happens outside this crate. The chosen backend is
/// then wrapped in the caching repository with a primary tier (Redis
/// when `use_distributed_cache` is set, an in-process map otherwise)
/// and the on-disk file cache.
///
/// # Errors
///
/// Returns `ServiceError::MissingCollection` when the document backend
/// is selected without a collection, and propagates store seeding and
/// cache connection faults.
pub async fn build_record_store(
    config: &StashConfig,
    collection: Option<DynDocumentCollection>,
) -> ServiceResult<DynRecordStore> {
    let store: DynRecordStore = match config.storage.backend {
        StorageBackend::Memory => Arc::new(InMemoryRecordStore::new()),
        StorageBackend::DocumentDb => {
            let collection = collection.ok_or(ServiceError::MissingCollection)?;
            Arc::new(DocumentRecordStore::connect(collection).await?)
        }
    };

    let primary = build_primary_tier(&config.cache).await?;
    let file = FileCache::new(
        config.cache.file_cache_path.clone(),
        config.cache.file_cache_duration(),
    );

    info!(
        backend = store.backend_name(),
        distributed = config.cache.use_distributed_cache,
        "record store wired"
    );
    Ok(Arc::new(CachedRecordStore::new(store, primary, file)))
}

async fn build_primary_tier(cache: &CacheSettings) -> ServiceResult<DynCacheTier> {
    if cache.use_distributed_cache {
        let url = cache
            .redis_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(ServiceError::MissingRedisUrl)?;
        let tier = RedisCache::connect(url, cache.cache_duration()).await?;
        Ok(Arc::new(tier))
    } else {
        Ok(Arc::new(MemoryCache::new(
            cache.cache_duration(),
            PRIMARY_CACHE_CAPACITY,
        )))
    }
}

/// Builds the auth service over the given user store.
///
/// # Errors
///
/// Returns `AuthError::WeakSecret` (wrapped) when the configured signing
/// secret is too short.
pub fn build_auth_service(users: DynUserStore, token: &TokenSettings) -> ServiceResult<AuthService> {
    let jwt = JwtService::new(
        JwtConfig::new(&token.secret, &token.issuer, &token.audience)
            .with_expiration(token.expiration()),
    )?;
    Ok(AuthService::new(users, jwt))
}
