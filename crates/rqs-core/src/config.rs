//! Configuration for rqs

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// User configuration, read from `~/.config/rqs/config.json`
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Entry storage directory (default: ~/.rqs_storage)
    #[serde(default)]
    pub storage_path: Option<PathBuf>,

    /// Colorize terminal output
    #[serde(default = "default_color")]
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_path: None,
            color: default_color(),
        }
    }
}

fn default_color() -> bool {
    true
}

impl Config {
    /// Load config from file, falling back to defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            let config = serde_json::from_str(&content)
                .with_context(|| format!("Invalid config {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }
}
