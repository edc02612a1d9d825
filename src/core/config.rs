//! Host configuration management

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use super::store::LoadOptions;

/// Configuration for a process hosting a document store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the documents
    pub content_dir: Option<PathBuf>,
    /// How documents are enumerated and split
    pub load: LoadOptions,
    /// Quiet period before a watched change triggers a reload
    pub watch_debounce_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            content_dir: None,
            load: LoadOptions::default(),
            watch_debounce_ms: 250,
        }
    }
}

impl StoreConfig {
    /// Default config file location
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "docstore", "Docstore")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load from the default location, or defaults if there is no file
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        tracing::debug!("Loaded config from: {}", path.display());
        Ok(config)
    }

    /// Content directory, falling back to the working directory
    pub fn content_dir(&self) -> PathBuf {
        self.content_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Quiet period as a [`Duration`]
    pub fn watch_debounce(&self) -> Duration {
        Duration::from_millis(self.watch_debounce_ms)
    }
}
