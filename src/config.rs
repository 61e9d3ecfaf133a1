//! User configuration for rendering

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Prefix used when none is configured or given on the command line
pub const DEFAULT_PREFIX: &str = "block";

/// Defaults applied to loaded block definitions
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RenderConfig {
    /// Prefix for the root block's form field names
    pub prefix: Option<String>,
    /// Label of the edit prompt above preview summaries
    pub edit_label: Option<String>,
    /// Help icon markup for blocks that do not set one
    pub help_icon: Option<String>,
}

impl RenderConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("io", "structblock", "structblock")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if let Some(path) = path {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: RenderConfig = serde_json::from_str(&content)?;
                tracing::debug!("loaded config from {}", path.display());
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    pub fn prefix(&self) -> &str {
        self.prefix.as_deref().unwrap_or(DEFAULT_PREFIX)
    }
}
