use std::path::PathBuf;

use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Sled settings for the persisted peer books
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StorageConfig {
    /// Database directory
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Tree holding every peer key
    #[serde(default = "default_tree_name")]
    pub tree_name: String,

    /// Page cache size in bytes
    #[serde(default = "default_cache_capacity_bytes")]
    pub cache_capacity_bytes: u64,

    /// Background fsync interval; `None` flushes only on explicit `flush()`
    #[serde(default = "default_flush_every_ms")]
    pub flush_every_ms: Option<u64>,

    #[serde(default)]
    pub use_compression: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            tree_name: default_tree_name(),
            cache_capacity_bytes: default_cache_capacity_bytes(),
            flush_every_ms: default_flush_every_ms(),
            use_compression: false,
        }
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.db_path.as_os_str().is_empty() {
            return Err(Error::Config(ConfigError::Message(
                "storage.db_path cannot be empty".into(),
            )));
        }
        if self.tree_name.trim().is_empty() {
            return Err(Error::Config(ConfigError::Message(
                "storage.tree_name cannot be empty".into(),
            )));
        }
        if self.cache_capacity_bytes == 0 {
            return Err(Error::Config(ConfigError::Message(
                "storage.cache_capacity_bytes must be greater than 0".into(),
            )));
        }
        if self.flush_every_ms == Some(0) {
            return Err(Error::Config(ConfigError::Message(
                "storage.flush_every_ms must be greater than 0 when set".into(),
            )));
        }
        Ok(())
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./db/peerstore")
}
fn default_tree_name() -> String {
    "peerstore".to_string()
}
fn default_cache_capacity_bytes() -> u64 {
    64 * 1024 * 1024 //64MB
}
fn default_flush_every_ms() -> Option<u64> {
    Some(500)
}
