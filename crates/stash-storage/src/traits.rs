//! Storage traits for the Stash storage abstraction layer.
//!
//! These are the contracts every backing store implements. They are
//! object-safe and `Send + Sync` so stores can be shared behind an `Arc`
//! and substituted freely (the caching repository implements
//! [`RecordStore`] too, layered on top of a real backend).

use std::sync::Arc;

use async_trait::async_trait;
use stash_core::{Record, User};

use crate::error::StorageResult;
use crate::types::{NewRecord, NewUser};

/// The record storage contract.
///
/// Missing records are reported as `None`/`false`, never as errors;
/// errors are reserved for backend faults.
///
/// # Example
///
/// ```ignore
/// use stash_storage::{RecordStore, StorageError};
///
/// async fn first_value(store: &dyn RecordStore) -> Result<Option<String>, StorageError> {
///     Ok(store.get(1).await?.map(|r| r.value))
/// }
/// ```
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Reads a record by id. Returns `None` if it does not exist.
    async fn get(&self, id: u64) -> StorageResult<Option<Record>>;

    /// Returns all records in ascending id order.
    async fn get_all(&self) -> StorageResult<Vec<Record>>;

    /// Creates a record, assigning its id and creation timestamp.
    ///
    /// Ids are unique and monotonic within a store's lifetime; concurrent
    /// creates must never observe or assign duplicates.
    async fn create(&self, record: NewRecord) -> StorageResult<Record>;

    /// Updates the value of an existing record.
    ///
    /// Returns the updated record, or `None` when no record with that id
    /// exists. The creation timestamp is preserved.
    async fn update(&self, id: u64, record: NewRecord) -> StorageResult<Option<Record>>;

    /// Deletes a record by id. Returns `true` if a record was removed.
    async fn delete(&self, id: u64) -> StorageResult<bool>;

    /// Returns whether a record with the given id exists.
    async fn exists(&self, id: u64) -> StorageResult<bool>;

    /// Returns the name of this storage backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}

/// The user storage contract consumed by the auth service.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Finds a user by id. Returns `None` if the user does not exist.
    async fn find_by_id(&self, id: u64) -> StorageResult<Option<User>>;

    /// Finds a user by username, matched case-insensitively.
    async fn find_by_username(&self, username: &str) -> StorageResult<Option<User>>;

    /// Creates a user, assigning its id and creation timestamp.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::DuplicateUsername` when a user with the same
    /// username (case-insensitively) already exists.
    async fn create(&self, user: NewUser) -> StorageResult<User>;

    /// Returns whether a user with the given username exists,
    /// matched case-insensitively.
    async fn exists_by_username(&self, username: &str) -> StorageResult<bool>;
}

/// Type alias for a shareable record store instance.
pub type DynRecordStore = Arc<dyn RecordStore>;

/// Type alias for a shareable user store instance.
pub type DynUserStore = Arc<dyn UserStore>;
