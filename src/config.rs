//! User configuration for the terminal host.
//!
//! Read from `config.json` in the draftkeep config directory. A missing file
//! means defaults; a broken one is reported and ignored.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use draftkeep_session::SessionConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub session: SessionConfig,
    /// Profile directory for local snapshots
    pub storage_dir: Option<PathBuf>,
    /// Directory acting as the document service
    pub remote_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Load from the config directory, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring config file");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        serde_json::from_str(&content).with_context(|| format!("Failed to parse {:?}", path))
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        let config_dir = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".config")
            });
        config_dir.join("draftkeep").join("config.json")
    }
}
