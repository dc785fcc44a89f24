//! In-memory storage backend for the Stash server.
//!
//! Transient, process-scoped implementations of the storage traits built
//! on the lock-free `papaya` hash map. Useful for development, testing,
//! and deployments that do not need durability.

pub mod records;
pub mod users;

pub use records::InMemoryRecordStore;
pub use users::InMemoryUserStore;
