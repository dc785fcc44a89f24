//! Layered caching for the Stash server.
//!
//! Three tiers sit behind one repository interface:
//!
//! - primary tier: in-process ([`MemoryCache`], moka) or distributed
//!   ([`RedisCache`]), holding serialized records by key
//! - secondary tier: [`FileCache`], per-key on-disk snapshots with the
//!   expiry embedded in the file name
//! - the backing store itself, reached through
//!   [`RecordStore`](stash_storage::RecordStore)
//!
//! [`CachedRecordStore`] orchestrates read-through and
//! write-invalidation across the tiers. The cache is best-effort
//! throughout: every cache fault is logged and swallowed, and only
//! backing store errors propagate.

pub mod cached_store;
pub mod error;
pub mod file;
pub mod keys;
pub mod tier;

pub use cached_store::CachedRecordStore;
pub use error::CacheError;
pub use file::FileCache;
pub use keys::{ALL_ITEMS_KEY, item_key};
pub use tier::{CacheTier, DynCacheTier, MemoryCache, RedisCache};
