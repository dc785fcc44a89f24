//! Storage abstraction layer for the Stash server.
//!
//! Defines the [`RecordStore`] and [`UserStore`] contracts that every
//! backing store implements, the [`StorageError`] taxonomy, and the
//! backend selection type resolved once at startup.

pub mod backend;
pub mod error;
pub mod traits;
pub mod types;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use traits::{DynRecordStore, DynUserStore, RecordStore, UserStore};
pub use types::{NewRecord, NewUser};
