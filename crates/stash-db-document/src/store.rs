use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use stash_core::Record;
use stash_storage::{NewRecord, RecordStore, StorageResult};
use time::OffsetDateTime;
use tracing::debug;

use crate::collection::DynDocumentCollection;

/// Record store backed by a document collection.
///
/// Records are stored as JSON documents keyed by their decimal id. The
/// store maintains one sequential numeric id scheme: the counter is
/// seeded once at connect time from the maximum id present in the
/// collection and advanced atomically afterwards, so concurrent creates
/// through this instance never collide.
pub struct DocumentRecordStore {
    collection: DynDocumentCollection,
    next_id: AtomicU64,
}

impl DocumentRecordStore {
    /// Connects the store to a collection, seeding the id counter by
    /// scanning for the maximum existing record id.
    ///
    /// # Errors
    ///
    /// Propagates any fault from listing the collection.
    pub async fn connect(collection: DynDocumentCollection) -> StorageResult<Self> {
        let documents = collection.list().await?;
        let max_id = documents
            .iter()
            .filter_map(|doc| doc.get("id").and_then(|id| id.as_u64()))
            .max()
            .unwrap_or(0);

        debug!(max_id, "seeded document store id counter");
        Ok(Self {
            collection,
            next_id: AtomicU64::new(max_id + 1),
        })
    }

    fn key_for(id: u64) -> String {
        id.to_string()
    }
}

#[async_trait]
impl RecordStore for DocumentRecordStore {
    async fn get(&self, id: u64) -> StorageResult<Option<Record>> {
        match self.collection.get(&Self::key_for(id)).await? {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    async fn get_all(&self) -> StorageResult<Vec<Record>> {
        let documents = self.collection.list().await?;
        let mut records = Vec::with_capacity(documents.len());
        for doc in documents {
            records.push(serde_json::from_value(doc)?);
        }
        records.sort_by_key(|r: &Record| r.id);
        Ok(records)
    }

    async fn create(&self, record: NewRecord) -> StorageResult<Record> {
        let created = Record {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            value: record.value,
            created_at: OffsetDateTime::now_utc(),
        };
        self.collection
            .put(&Self::key_for(created.id), serde_json::to_value(&created)?)
            .await?;
        Ok(created)
    }

    async fn update(&self, id: u64, record: NewRecord) -> StorageResult<Option<Record>> {
        let Some(doc) = self.collection.get(&Self::key_for(id)).await? else {
            return Ok(None);
        };
        let existing: Record = serde_json::from_value(doc)?;
        let updated = Record {
            id,
            value: record.value,
            created_at: existing.created_at,
        };
        self.collection
            .put(&Self::key_for(id), serde_json::to_value(&updated)?)
            .await?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: u64) -> StorageResult<bool> {
        self.collection.delete(&Self::key_for(id)).await
    }

    async fn exists(&self, id: u64) -> StorageResult<bool> {
        Ok(self.collection.get(&Self::key_for(id)).await?.is_some())
    }

    fn backend_name(&self) -> &'static str {
        "document-db"
    }
}
