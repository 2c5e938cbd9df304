//! Configuration management for the peer book.
//!
//! Provides hierarchical configuration loading and validation with:
//! - Default values as code base
//! - Configuration file support (`CONFIG_PATH`)
//! - Environment variable overrides (`PEERBOOK__` prefix)
//! - Component-wise validation
mod observers;
mod storage;

pub use observers::*;
pub use storage::*;


use std::env;

use config::Config;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Key;
use crate::Result;
use crate::DEFAULT_NAMESPACE;

const ENV_PREFIX: &str = "PEERBOOK";

/// Main configuration container of a peer store
///
/// Combines all subsystem configurations with hierarchical override support:
/// 1. Default values from code implementation
/// 2. Configuration file specified by `CONFIG_PATH`
/// 3. Environment variables (highest priority)
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PeerstoreConfig {
    /// Key prefix every peer facet is stored under
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Backing key-value store
    #[serde(default)]
    pub storage: StorageConfig,
    /// Write observers attached when the store is opened
    #[serde(default)]
    pub observers: ObserversConfig,
}

impl Default for PeerstoreConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            storage: StorageConfig::default(),
            observers: ObserversConfig::default(),
        }
    }
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

impl PeerstoreConfig {
    /// Loads configuration from hierarchical sources without validation.
    ///
    /// Sources merged in order (later sources override earlier):
    /// 1. Type defaults (lowest priority)
    /// 2. Configuration file from `CONFIG_PATH` environment variable (if set)
    /// 3. Environment variables with `PEERBOOK__` prefix (highest priority)
    ///
    /// # Note
    /// Callers MUST call `validate()` once all overrides are applied.
    ///
    /// # Examples
    /// ```ignore
    /// std::env::set_var("PEERBOOK__STORAGE__DB_PATH", "/var/lib/peers");
    /// let cfg = PeerstoreConfig::new()?.validate()?;
    /// ```
    pub fn new() -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Ok(config_path) = env::var("CONFIG_PATH") {
            builder = builder.add_source(File::with_name(&config_path).required(true));
        }

        builder = builder.add_source(environment());

        let config: Self = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Applies overrides from `path`, environment variables still win.
    pub fn with_override_config(
        &self,
        path: &str,
    ) -> Result<Self> {
        let config: Self = Config::builder()
            .add_source(Config::try_from(self)?)
            .add_source(File::with_name(path))
            .add_source(environment())
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Validates every section, consuming and returning the config.
    pub fn validate(self) -> Result<Self> {
        if Key::new(&self.namespace).as_str() == "/" {
            return Err(Error::Config(ConfigError::Message(
                "namespace must contain at least one path segment".into(),
            )));
        }
        self.storage.validate()?;
        self.observers.validate()?;
        Ok(self)
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .ignore_empty(true)
        .try_parsing(true)
}
