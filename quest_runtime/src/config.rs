//! Runtime configuration.
//!
//! Loaded from a TOML file; every field has a default, so an empty
//! file (or no file) is a valid configuration.
//!
//! ```toml
//! level_threshold = 1000
//! save_file = "quest.json"
//! ledger_file = "quest.ledger"
//! pretty_saves = true
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use quest_engine::arithmetic::DEFAULT_LEVEL_THRESHOLD;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuestConfig {
    /// Points per level.
    pub level_threshold: u64,
    /// Save file used by `save_default` / `load_default`.
    pub save_file: PathBuf,
    /// Activity ledger; no ledger is kept when unset.
    pub ledger_file: Option<PathBuf>,
    /// Indent save files for hand editing.
    pub pretty_saves: bool,
}

impl Default for QuestConfig {
    fn default() -> Self {
        Self {
            level_threshold: DEFAULT_LEVEL_THRESHOLD,
            save_file: PathBuf::from("quest.json"),
            ledger_file: None,
            pretty_saves: true,
        }
    }
}

impl QuestConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: QuestConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Like `load`, but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!("Config {:?} not found, using defaults", path);
            return Ok(Self::default());
        }
        Self::load(path)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.level_threshold == 0 {
            return Err(ConfigError::Invalid(
                "level_threshold must be greater than 0".to_string(),
            ));
        }
        if self.save_file.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("save_file must not be empty".to_string()));
        }
        Ok(())
    }
}
