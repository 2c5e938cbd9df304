use std::path::PathBuf;
use std::str::FromStr;

use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;
use tracing::Level;

use crate::Error;
use crate::Result;

/// Observers attached to the mirrored store at open time
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ObserversConfig {
    /// Emit one tracing event per persisted write
    #[serde(default)]
    pub log_enabled: bool,

    /// Level of the log observer events: trace, debug, info, warn or error
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Append every persisted write to this CSV file
    #[serde(default)]
    pub csv_path: Option<PathBuf>,
}

impl Default for ObserversConfig {
    fn default() -> Self {
        Self {
            log_enabled: false,
            log_level: default_log_level(),
            csv_path: None,
        }
    }
}

impl ObserversConfig {
    pub fn validate(&self) -> Result<()> {
        self.level()?;
        if let Some(path) = &self.csv_path {
            if path.as_os_str().is_empty() {
                return Err(Error::Config(ConfigError::Message(
                    "observers.csv_path cannot be empty when set".into(),
                )));
            }
        }
        Ok(())
    }

    pub fn level(&self) -> Result<Level> {
        Level::from_str(&self.log_level).map_err(|_| {
            Error::Config(ConfigError::Message(format!(
                "observers.log_level '{}' is not a valid level",
                self.log_level
            )))
        })
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
