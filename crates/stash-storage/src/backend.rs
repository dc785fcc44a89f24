//! Backend selection.

use serde::{Deserialize, Serialize};

/// Supported storage backend kinds.
///
/// Resolved once from configuration at startup; call sites dispatch on
/// the constructed store, never on configuration strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageBackend {
    /// Transient in-process store backed by a lock-free map.
    #[serde(rename = "memory")]
    Memory,
    /// Persistent document-database store.
    #[serde(rename = "document-db")]
    DocumentDb,
}

impl Default for StorageBackend {
    fn default() -> Self {
        Self::Memory
    }
}
