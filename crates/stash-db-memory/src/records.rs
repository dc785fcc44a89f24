use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use papaya::HashMap as PapayaHashMap;
use stash_core::Record;
use stash_storage::{NewRecord, RecordStore, StorageResult};
use time::OffsetDateTime;

/// In-memory record store using a papaya lock-free HashMap.
///
/// Id assignment goes through a single atomic counter, so concurrent
/// creates always receive distinct, consecutive identifiers. Ids are
/// never reused within the store's lifetime, even after deletes.
#[derive(Debug)]
pub struct InMemoryRecordStore {
    data: Arc<PapayaHashMap<u64, Record>>,
    next_id: AtomicU64,
}

impl InMemoryRecordStore {
    /// Creates an empty store; the first assigned id is 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: Arc::new(PapayaHashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of records currently stored.
    pub fn count(&self) -> usize {
        self.data.pin().len()
    }

    fn assign_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn get(&self, id: u64) -> StorageResult<Option<Record>> {
        let guard = self.data.pin();
        Ok(guard.get(&id).cloned())
    }

    async fn get_all(&self) -> StorageResult<Vec<Record>> {
        let guard = self.data.pin();
        let mut records: Vec<Record> = guard.iter().map(|(_, r)| r.clone()).collect();
        records.sort_by_key(|r| r.id);
        Ok(records)
    }

    async fn create(&self, record: NewRecord) -> StorageResult<Record> {
        let created = Record {
            id: self.assign_id(),
            value: record.value,
            created_at: OffsetDateTime::now_utc(),
        };
        let guard = self.data.pin();
        guard.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: u64, record: NewRecord) -> StorageResult<Option<Record>> {
        let guard = self.data.pin();
        let Some(existing) = guard.get(&id) else {
            return Ok(None);
        };
        let updated = Record {
            id,
            value: record.value,
            created_at: existing.created_at,
        };
        guard.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, id: u64) -> StorageResult<bool> {
        let guard = self.data.pin();
        Ok(guard.remove(&id).is_some())
    }

    async fn exists(&self, id: u64) -> StorageResult<bool> {
        let guard = self.data.pin();
        Ok(guard.contains_key(&id))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let store = InMemoryRecordStore::new();

        let a = store.create(NewRecord::new("A")).await.unwrap();
        let b = store.create(NewRecord::new("B")).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);

        let all = store.get_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].value, "A");
        assert_eq!(all[1].value, "B");
    }

    #[tokio::test]
    async fn test_get_and_exists() {
        let store = InMemoryRecordStore::new();
        let created = store.create(NewRecord::new("hello")).await.unwrap();

        let fetched = store.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.value, "hello");
        assert!(store.exists(created.id).await.unwrap());

        assert!(store.get(999).await.unwrap().is_none());
        assert!(!store.exists(999).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_preserves_created_at() {
        let store = InMemoryRecordStore::new();
        let created = store.create(NewRecord::new("before")).await.unwrap();

        let updated = store
            .update(created.id, NewRecord::new("after"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.value, "after");
        assert_eq!(updated.created_at, created.created_at);

        // Update of a missing id reports None without side effects
        assert!(store.update(999, NewRecord::new("x")).await.unwrap().is_none());
        assert_eq!(store.count(), 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = InMemoryRecordStore::new();
        let created = store.create(NewRecord::new("doomed")).await.unwrap();

        assert!(store.delete(created.id).await.unwrap());
        assert!(!store.delete(created.id).await.unwrap());
        assert!(store.get(created.id).await.unwrap().is_none());
        assert!(store.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let store = InMemoryRecordStore::new();
        let first = store.create(NewRecord::new("one")).await.unwrap();
        store.delete(first.id).await.unwrap();

        let second = store.create(NewRecord::new("two")).await.unwrap();
        assert_eq!(second.id, first.id + 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_creates_assign_distinct_ids() {
        use tokio::task::JoinSet;

        let store = Arc::new(InMemoryRecordStore::new());
        let mut join_set = JoinSet::new();

        for i in 0..100 {
            let store_clone = Arc::clone(&store);
            join_set.spawn(async move {
                store_clone
                    .create(NewRecord::new(format!("value-{i}")))
                    .await
                    .unwrap()
                    .id
            });
        }

        let mut ids = Vec::new();
        while let Some(result) = join_set.join_next().await {
            ids.push(result.unwrap());
        }

        ids.sort_unstable();
        // Consecutive from the seed, no duplicates
        let expected: Vec<u64> = (1..=100).collect();
        assert_eq!(ids, expected);
        assert_eq!(store.count(), 100);
    }
}
