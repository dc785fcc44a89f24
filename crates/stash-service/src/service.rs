//! The record service.

use std::time::Instant;

use stash_core::Record;
use stash_storage::{DynRecordStore, NewRecord};
use tracing::debug;

use crate::dto::{CreateRecordRequest, RecordResponse, UpdateRecordRequest};
use crate::error::ServiceResult;

/// Maps wire shapes onto the repository contract.
///
/// Value-length invariants are enforced here, at the outermost internal
/// boundary, so every store implementation can assume well-formed input.
/// Each operation is individually timed; instrumentation is an explicit
/// wrapper around the call, not a decorated store implementation.
pub struct RecordService {
    repo: DynRecordStore,
}

impl RecordService {
    /// Creates the service over any record store, cached or not.
    #[must_use]
    pub fn new(repo: DynRecordStore) -> Self {
        Self { repo }
    }

    /// Fetches a record by id.
    ///
    /// # Errors
    ///
    /// Propagates backing store faults.
    pub async fn get(&self, id: u64) -> ServiceResult<Option<RecordResponse>> {
        let (result, elapsed) = timed(self.repo.get(id)).await;
        debug!(id, ?elapsed, "get record");
        Ok(result?.map(RecordResponse::from))
    }

    /// Lists all records in ascending id order.
    ///
    /// # Errors
    ///
    /// Propagates backing store faults.
    pub async fn list(&self) -> ServiceResult<Vec<RecordResponse>> {
        let (result, elapsed) = timed(self.repo.get_all()).await;
        let records = result?;
        debug!(count = records.len(), ?elapsed, "list records");
        Ok(records.into_iter().map(RecordResponse::from).collect())
    }

    /// Creates a record.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::InvalidRecord` when the value is empty or
    /// too long, and propagates backing store faults.
    pub async fn create(&self, request: CreateRecordRequest) -> ServiceResult<RecordResponse> {
        Record::validate_value(&request.value)?;
        let (result, elapsed) = timed(self.repo.create(NewRecord::new(request.value))).await;
        let record = result?;
        debug!(id = record.id, ?elapsed, "created record");
        Ok(RecordResponse::from(record))
    }

    /// Replaces a record's value.
    ///
    /// Returns `None` when no record with that id exists.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::InvalidRecord` when the value is empty or
    /// too long, and propagates backing store faults.
    pub async fn update(
        &self,
        id: u64,
        request: UpdateRecordRequest,
    ) -> ServiceResult<Option<RecordResponse>> {
        Record::validate_value(&request.value)?;
        let (result, elapsed) = timed(self.repo.update(id, NewRecord::new(request.value))).await;
        debug!(id, ?elapsed, "updated record");
        Ok(result?.map(RecordResponse::from))
    }

    /// Deletes a record. Returns `true` if a record was removed.
    ///
    /// # Errors
    ///
    /// Propagates backing store faults.
    pub async fn delete(&self, id: u64) -> ServiceResult<bool> {
        let (result, elapsed) = timed(self.repo.delete(id)).await;
        debug!(id, ?elapsed, "deleted record");
        Ok(result?)
    }

    /// Returns whether a record exists, bypassing caches.
    ///
    /// # Errors
    ///
    /// Propagates backing store faults.
    pub async fn exists(&self, id: u64) -> ServiceResult<bool> {
        let (result, elapsed) = timed(self.repo.exists(id)).await;
        debug!(id, ?elapsed, "checked record existence");
        Ok(result?)
    }
}

/// Runs a future and reports how long it took.
async fn timed<T>(fut: impl Future<Output = T>) -> (T, std::time::Duration) {
    let start = Instant::now();
    let result = fut.await;
    (result, start.elapsed())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use stash_core::{CoreError, RECORD_VALUE_MAX_LEN};
    use stash_db_memory::InMemoryRecordStore;

    use super::*;
    use crate::error::ServiceError;

    fn service() -> RecordService {
        RecordService::new(Arc::new(InMemoryRecordStore::new()))
    }

    fn create(value: &str) -> CreateRecordRequest {
        CreateRecordRequest {
            value: value.to_string(),
        }
    }

    fn update(value: &str) -> UpdateRecordRequest {
        UpdateRecordRequest {
            value: value.to_string(),
        }
    }

    #[tokio::test]
    async fn test_crud_round_trip() {
        let service = service();

        let created = service.create(create("first")).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.value, "first");

        let fetched = service.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);

        let updated = service
            .update(created.id, update("second"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.value, "second");
        assert_eq!(updated.created_at, created.created_at);

        assert!(service.delete(created.id).await.unwrap());
        assert!(service.get(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_in_id_order() {
        let service = service();
        service.create(create("a")).await.unwrap();
        service.create(create("b")).await.unwrap();
        service.create(create("c")).await.unwrap();

        let all = service.list().await.unwrap();
        assert_eq!(
            all.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[tokio::test]
    async fn test_invalid_values_rejected_before_the_store() {
        let service = service();

        let result = service.create(create("")).await;
        assert!(matches!(
            result,
            Err(ServiceError::InvalidRecord(CoreError::InvalidValue { .. }))
        ));

        let too_long = "a".repeat(RECORD_VALUE_MAX_LEN + 1);
        assert!(service.create(create(&too_long)).await.is_err());

        // Nothing reached the store
        assert!(service.list().await.unwrap().is_empty());

        service.create(create("ok")).await.unwrap();
        assert!(service.update(1, update("")).await.is_err());
        assert_eq!(service.get(1).await.unwrap().unwrap().value, "ok");
    }

    #[tokio::test]
    async fn test_missing_ids_are_not_errors() {
        let service = service();

        assert!(service.get(42).await.unwrap().is_none());
        assert!(service.update(42, update("x")).await.unwrap().is_none());
        assert!(!service.delete(42).await.unwrap());
        assert!(!service.exists(42).await.unwrap());
    }
}
