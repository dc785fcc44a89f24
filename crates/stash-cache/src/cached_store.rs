//! The caching record repository.
//!
//! [`CachedRecordStore`] implements [`RecordStore`] and is therefore
//! fully substitutable for the backing store it wraps. Reads walk the
//! tiers top-down (primary, file, store) and populate the tiers above on
//! the way back; writes go to the store first and then invalidate both
//! cache tiers. Existence checks bypass the caches entirely: they gate
//! write paths where staleness is unacceptable.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use stash_core::Record;
use stash_storage::{DynRecordStore, NewRecord, RecordStore, StorageResult};
use tracing::{debug, warn};

use crate::file::FileCache;
use crate::keys::{ALL_ITEMS_KEY, item_key};
use crate::tier::DynCacheTier;

/// Read-through, write-invalidate repository over three tiers.
pub struct CachedRecordStore {
    store: DynRecordStore,
    primary: DynCacheTier,
    file: FileCache,
}

impl CachedRecordStore {
    /// Layers the given cache tiers over a backing store.
    #[must_use]
    pub fn new(store: DynRecordStore, primary: DynCacheTier, file: FileCache) -> Self {
        Self {
            store,
            primary,
            file,
        }
    }

    /// Primary-tier read; any fault degrades to a miss.
    async fn primary_get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let json = match self.primary.get_string(key).await {
            Ok(json) => json?,
            Err(e) => {
                warn!(key, tier = self.primary.tier_name(), error = %e, "primary cache read failed");
                return None;
            }
        };
        match serde_json::from_str(&json) {
            Ok(value) => {
                debug!(key, "primary cache hit");
                Some(value)
            }
            Err(e) => {
                warn!(key, error = %e, "discarding corrupt primary cache entry");
                self.primary_remove(key).await;
                None
            }
        }
    }

    /// Primary-tier population; any fault degrades to a no-op.
    async fn primary_put<T: serde::Serialize>(&self, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!(key, error = %e, "primary cache serialization failed");
                return;
            }
        };
        if let Err(e) = self.primary.set_string(key, json).await {
            warn!(key, tier = self.primary.tier_name(), error = %e, "primary cache write failed");
        }
    }

    async fn primary_remove(&self, key: &str) {
        if let Err(e) = self.primary.remove(key).await {
            warn!(key, tier = self.primary.tier_name(), error = %e, "primary cache invalidation failed");
        }
    }

    /// Invalidation shared by every mutating path. `FileCache::remove`
    /// already drops the on-disk collection snapshot alongside the item
    /// entry, so the collection ends up invalidated exactly once per
    /// tier.
    async fn invalidate(&self, id: u64) {
        self.primary_remove(&item_key(id)).await;
        self.primary_remove(ALL_ITEMS_KEY).await;
        self.file.remove(id).await;
    }
}

#[async_trait]
impl RecordStore for CachedRecordStore {
    async fn get(&self, id: u64) -> StorageResult<Option<Record>> {
        let key = item_key(id);

        if let Some(record) = self.primary_get::<Record>(&key).await {
            return Ok(Some(record));
        }

        if let Some(record) = self.file.get(id).await {
            debug!(id, "file cache hit");
            self.primary_put(&key, &record).await;
            return Ok(Some(record));
        }

        // Store faults propagate; they are the only fatal class here.
        let Some(record) = self.store.get(id).await? else {
            return Ok(None);
        };
        self.file.set(&record).await;
        self.primary_put(&key, &record).await;
        Ok(Some(record))
    }

    async fn get_all(&self) -> StorageResult<Vec<Record>> {
        // The collection read path probes the primary tier only; the file
        // tier is skipped by design.
        if let Some(records) = self.primary_get::<Vec<Record>>(ALL_ITEMS_KEY).await {
            return Ok(records);
        }

        let records = self.store.get_all().await?;
        self.primary_put(ALL_ITEMS_KEY, &records).await;
        Ok(records)
    }

    async fn create(&self, record: NewRecord) -> StorageResult<Record> {
        let created = self.store.create(record).await?;
        // The item key is fresh, so only the collection is stale.
        self.invalidate(created.id).await;
        Ok(created)
    }

    async fn update(&self, id: u64, record: NewRecord) -> StorageResult<Option<Record>> {
        let Some(updated) = self.store.update(id, record).await? else {
            // Nothing changed, caches stay untouched.
            return Ok(None);
        };
        self.invalidate(id).await;
        Ok(Some(updated))
    }

    async fn delete(&self, id: u64) -> StorageResult<bool> {
        if !self.store.delete(id).await? {
            return Ok(false);
        }
        self.invalidate(id).await;
        Ok(true)
    }

    async fn exists(&self, id: u64) -> StorageResult<bool> {
        self.store.exists(id).await
    }

    fn backend_name(&self) -> &'static str {
        "cached"
    }
}
