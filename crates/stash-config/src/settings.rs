//! Configuration schema and loading.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use stash_storage::StorageBackend;

use crate::error::{ConfigError, ConfigResult};

/// Minimum length of the token signing secret, in bytes.
const MIN_SECRET_BYTES: usize = 32;

/// Top-level server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StashConfig {
    /// Cache tier settings.
    #[serde(default)]
    pub cache: CacheSettings,

    /// Backing-store selection.
    #[serde(default)]
    pub storage: StorageSettings,

    /// Token signing settings. No usable default exists for the secret,
    /// so this section is required.
    pub token: TokenSettings,
}

/// Cache tier settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Use Redis as the primary cache tier instead of the in-process map.
    #[serde(default)]
    pub use_distributed_cache: bool,

    /// Primary cache entry lifetime, in minutes.
    #[serde(default = "default_cache_duration_minutes")]
    pub cache_duration_minutes: u64,

    /// File cache entry lifetime, in minutes.
    #[serde(default = "default_file_cache_duration_minutes")]
    pub file_cache_duration_minutes: u64,

    /// Directory holding file cache entries.
    #[serde(default = "default_file_cache_path")]
    pub file_cache_path: PathBuf,

    /// Redis connection URL. Required when `use_distributed_cache` is set.
    #[serde(default)]
    pub redis_url: Option<String>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            use_distributed_cache: false,
            cache_duration_minutes: default_cache_duration_minutes(),
            file_cache_duration_minutes: default_file_cache_duration_minutes(),
            file_cache_path: default_file_cache_path(),
            redis_url: None,
        }
    }
}

impl CacheSettings {
    /// Primary cache lifetime as a [`Duration`].
    #[must_use]
    pub fn cache_duration(&self) -> Duration {
        Duration::from_secs(self.cache_duration_minutes * 60)
    }

    /// File cache lifetime as a [`Duration`].
    #[must_use]
    pub fn file_cache_duration(&self) -> Duration {
        Duration::from_secs(self.file_cache_duration_minutes * 60)
    }
}

fn default_cache_duration_minutes() -> u64 {
    10
}

fn default_file_cache_duration_minutes() -> u64 {
    30
}

fn default_file_cache_path() -> PathBuf {
    PathBuf::from("./filecache")
}

/// Backing-store selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Which backend serves as the store of record.
    #[serde(default)]
    pub backend: StorageBackend,
}

/// Token signing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSettings {
    /// Signing secret, at least 32 bytes.
    pub secret: String,

    /// Issuer claim stamped into and required of every token.
    #[serde(default = "default_issuer")]
    pub issuer: String,

    /// Audience claim stamped into and required of every token.
    #[serde(default = "default_audience")]
    pub audience: String,

    /// Token lifetime, in minutes.
    #[serde(default = "default_expiration_minutes")]
    pub expiration_minutes: u64,
}

impl TokenSettings {
    /// Token lifetime as a [`Duration`].
    #[must_use]
    pub fn expiration(&self) -> Duration {
        Duration::from_secs(self.expiration_minutes * 60)
    }
}

fn default_issuer() -> String {
    "stash".to_string()
}

fn default_audience() -> String {
    "stash-clients".to_string()
}

fn default_expiration_minutes() -> u64 {
    60
}

impl StashConfig {
    /// Checks the merged configuration for invariant violations.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` naming the first offending
    /// field.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.cache.cache_duration_minutes == 0 {
            return Err(ConfigError::validation(
                "cache.cache_duration_minutes must be > 0",
            ));
        }
        if self.cache.file_cache_duration_minutes == 0 {
            return Err(ConfigError::validation(
                "cache.file_cache_duration_minutes must be > 0",
            ));
        }
        if self.cache.file_cache_path.as_os_str().is_empty() {
            return Err(ConfigError::validation(
                "cache.file_cache_path must not be empty",
            ));
        }
        if self.cache.use_distributed_cache
            && self
                .cache
                .redis_url
                .as_deref()
                .unwrap_or("")
                .trim()
                .is_empty()
        {
            return Err(ConfigError::validation(
                "cache.use_distributed_cache=true requires cache.redis_url",
            ));
        }
        if self.token.secret.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::validation(format!(
                "token.secret must be at least {MIN_SECRET_BYTES} bytes"
            )));
        }
        if self.token.issuer.trim().is_empty() {
            return Err(ConfigError::validation("token.issuer must not be empty"));
        }
        if self.token.audience.trim().is_empty() {
            return Err(ConfigError::validation("token.audience must not be empty"));
        }
        if self.token.expiration_minutes == 0 {
            return Err(ConfigError::validation(
                "token.expiration_minutes must be > 0",
            ));
        }
        Ok(())
    }
}

/// Loads configuration from an optional TOML file plus `STASH`-prefixed
/// environment overrides (e.g. `STASH__TOKEN__SECRET`), then validates.
///
/// A missing file is not an error; the defaults and environment still
/// apply. A present-but-invalid file is.
///
/// # Errors
///
/// Returns `ConfigError::Load` when a source cannot be read or the
/// merge does not deserialize, and `ConfigError::Validation` when the
/// result violates an invariant.
pub fn load_config(path: Option<&Path>) -> ConfigResult<StashConfig> {
    let mut builder = Config::builder();
    match path {
        Some(p) => {
            if p.exists() {
                builder = builder.add_source(File::from(p.to_path_buf()));
            }
        }
        None => {
            let default_path = PathBuf::from("stash.toml");
            if default_path.exists() {
                builder = builder.add_source(File::from(default_path));
            }
        }
    }
    builder = builder.add_source(
        Environment::with_prefix("STASH")
            .try_parsing(true)
            .separator("__"),
    );

    let merged: StashConfig = builder.build()?.try_deserialize()?;
    merged.validate()?;
    Ok(merged)
}
