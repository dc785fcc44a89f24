//! Configuration for the Stash server.
//!
//! Settings load from an optional TOML file with environment-variable
//! overrides under the `STASH` prefix (e.g. `STASH__CACHE__REDIS_URL`),
//! then pass through [`StashConfig::validate`] so invariant violations
//! surface at startup rather than mid-request.

pub mod error;
pub mod settings;

pub use error::{ConfigError, ConfigResult};
pub use settings::{CacheSettings, StashConfig, StorageSettings, TokenSettings, load_config};
