//! Cache key scheme.
//!
//! Two key shapes exist: one per record and one sentinel for the whole
//! collection. Any write to a record invalidates its own key and always
//! the collection key.

/// Key under which the full record collection is cached.
pub const ALL_ITEMS_KEY: &str = "items:all";

/// Builds the cache key for a single record.
#[must_use]
pub fn item_key(id: u64) -> String {
    format!("item:{id}")
}
