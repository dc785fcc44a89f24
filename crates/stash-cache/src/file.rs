//! Secondary on-disk cache tier.
//!
//! Each entry is one JSON file whose name encodes the key and the
//! absolute expiry timestamp rounded down to the minute:
//! `item-<id>.<expiry-unix>.json` for single records and
//! `items-all.<expiry-unix>.json` for the collection snapshot. A read
//! past the embedded expiry deletes the file and reports a miss.
//!
//! The file cache must never be a hard dependency: every I/O or
//! serialization failure is logged and degrades to a miss or no-op.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use stash_core::Record;
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::error::CacheError;

/// Clock used to stamp and check expiries. Injectable for tests.
pub type Clock = Arc<dyn Fn() -> OffsetDateTime + Send + Sync>;

const ALL_STEM: &str = "items-all";
const ENTRY_SUFFIX: &str = ".json";

fn item_stem(id: u64) -> String {
    format!("item-{id}")
}

/// On-disk cache of records below the primary tier.
#[derive(Clone)]
pub struct FileCache {
    dir: PathBuf,
    ttl: Duration,
    clock: Clock,
}

impl FileCache {
    /// Creates a file cache rooted at `dir` with entries valid for `ttl`.
    ///
    /// The directory is created lazily on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self::with_clock(dir, ttl, Arc::new(OffsetDateTime::now_utc))
    }

    /// Like [`FileCache::new`] but with an injected clock.
    #[must_use]
    pub fn with_clock(dir: impl Into<PathBuf>, ttl: Duration, clock: Clock) -> Self {
        Self {
            dir: dir.into(),
            ttl,
            clock,
        }
    }

    /// Fetches a cached record, or `None` on miss, expiry, or any fault.
    pub async fn get(&self, id: u64) -> Option<Record> {
        let json = self.read_entry(&item_stem(id)).await?;
        self.parse_entry(&json)
    }

    /// Fetches the cached collection snapshot.
    pub async fn get_all(&self) -> Option<Vec<Record>> {
        let json = self.read_entry(ALL_STEM).await?;
        self.parse_entry(&json)
    }

    /// Caches a single record.
    pub async fn set(&self, record: &Record) {
        match serde_json::to_string(record) {
            Ok(json) => self.write_entry(&item_stem(record.id), &json).await,
            Err(e) => warn!(id = record.id, error = %e, "file cache serialization failed"),
        }
    }

    /// Caches the collection snapshot.
    pub async fn set_all(&self, records: &[Record]) {
        match serde_json::to_string(records) {
            Ok(json) => self.write_entry(ALL_STEM, &json).await,
            Err(e) => warn!(error = %e, "file cache serialization failed"),
        }
    }

    /// Removes the entry for `id` and, unconditionally, the collection
    /// snapshot: the collection is stale whenever any member changes.
    pub async fn remove(&self, id: u64) {
        if let Err(e) = self.purge_stem(&item_stem(id)).await {
            warn!(id, error = %e, "file cache removal failed");
        }
        if let Err(e) = self.purge_stem(ALL_STEM).await {
            warn!(error = %e, "file cache snapshot removal failed");
        }
    }

    /// Drops every entry in the cache directory.
    pub async fn clear(&self) {
        if let Err(e) = self.try_clear().await {
            warn!(error = %e, "file cache clear failed");
        }
    }

    fn parse_entry<T: serde::de::DeserializeOwned>(&self, json: &str) -> Option<T> {
        match serde_json::from_str(json) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(error = %e, "discarding corrupt file cache entry");
                None
            }
        }
    }

    /// Expiry for entries written now: write time + ttl, rounded down to
    /// the minute.
    fn next_expiry(&self) -> i64 {
        let ts = ((self.clock)() + self.ttl).unix_timestamp();
        ts - ts % 60
    }

    fn entry_name(stem: &str, expiry: i64) -> String {
        format!("{stem}.{expiry}{ENTRY_SUFFIX}")
    }

    /// Parses the expiry out of a file name matching `stem`, or `None`
    /// when the name belongs to a different key.
    fn parse_expiry(stem: &str, file_name: &str) -> Option<i64> {
        let rest = file_name.strip_prefix(stem)?.strip_prefix('.')?;
        rest.strip_suffix(ENTRY_SUFFIX)?.parse().ok()
    }

    async fn read_entry(&self, stem: &str) -> Option<String> {
        match self.try_read_entry(stem).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!(stem, error = %e, "file cache read failed");
                None
            }
        }
    }

    async fn try_read_entry(&self, stem: &str) -> Result<Option<String>, CacheError> {
        if !self.dir.is_dir() {
            return Ok(None);
        }

        let now = (self.clock)().unix_timestamp();
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let Some(expiry) = Self::parse_expiry(stem, name) else {
                continue;
            };

            if now >= expiry {
                debug!(stem, "file cache entry expired");
                remove_quietly(&entry.path()).await;
                continue;
            }
            return Ok(Some(tokio::fs::read_to_string(entry.path()).await?));
        }
        Ok(None)
    }

    async fn write_entry(&self, stem: &str, json: &str) {
        if let Err(e) = self.try_write_entry(stem, json).await {
            warn!(stem, error = %e, "file cache write failed");
        }
    }

    async fn try_write_entry(&self, stem: &str, json: &str) -> Result<(), CacheError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        self.purge_stem(stem).await?;

        let path = self.dir.join(Self::entry_name(stem, self.next_expiry()));
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Deletes every entry file belonging to `stem`.
    async fn purge_stem(&self, stem: &str) -> Result<(), CacheError> {
        if !self.dir.is_dir() {
            return Ok(());
        }
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if Self::parse_expiry(stem, name).is_some() {
                remove_quietly(&entry.path()).await;
            }
        }
        Ok(())
    }

    async fn try_clear(&self) -> Result<(), CacheError> {
        if !self.dir.is_dir() {
            return Ok(());
        }
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            if name.to_str().is_some_and(|n| n.ends_with(ENTRY_SUFFIX)) {
                remove_quietly(&entry.path()).await;
            }
        }
        Ok(())
    }
}

async fn remove_quietly(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!(path = %path.display(), error = %e, "failed to delete file cache entry");
    }
}
