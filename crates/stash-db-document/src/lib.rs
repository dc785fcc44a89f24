//! Document-database storage backend for the Stash server.
//!
//! The external document database is an opaque collaborator: this crate
//! talks to it through the [`DocumentCollection`] capability (get, put,
//! delete, list JSON documents keyed by string) and layers the
//! [`RecordStore`](stash_storage::RecordStore) contract on top, including
//! sequential id assignment seeded from the collection's current maximum.
//! Wiring an actual driver behind [`DocumentCollection`] is the hosting
//! application's concern.

pub mod collection;
pub mod store;

pub use collection::{DocumentCollection, DynDocumentCollection};
pub use store::DocumentRecordStore;
