//! The opaque document-collection capability.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use stash_storage::StorageResult;

/// A keyed collection of JSON documents, as exposed by a document
/// database driver.
///
/// Implementations adapt a concrete driver to this request/response
/// contract; the store never sees the wire protocol. All methods report
/// backend faults as `StorageError`, which callers propagate uncaught.
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    /// Fetches the document stored under `key`, or `None`.
    async fn get(&self, key: &str) -> StorageResult<Option<Value>>;

    /// Stores `document` under `key`, replacing any existing document.
    async fn put(&self, key: &str, document: Value) -> StorageResult<()>;

    /// Deletes the document under `key`. Returns `true` if one existed.
    async fn delete(&self, key: &str) -> StorageResult<bool>;

    /// Returns all documents in the collection, in no particular order.
    async fn list(&self) -> StorageResult<Vec<Value>>;
}

/// Type alias for a shareable document collection handle.
pub type DynDocumentCollection = Arc<dyn DocumentCollection>;
