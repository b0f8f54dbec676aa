//! Configuration file for the CLI
//!
//! Supplies defaults for connection settings when the matching flags and
//! environment variables are absent.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::output::OutputFormat;

/// Defaults loaded from ~/.config/spot-advisor/config.json
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Pricing API endpoint URL
    pub api_url: Option<String>,
    /// Region analyzed when --region is absent
    pub default_region: Option<String>,
    /// Output format when --format is absent ("table" or "json")
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).context("Failed to read config file")?;

        serde_json::from_str(&content).context("Failed to parse config file")
    }

    /// Parsed default output format, if present and recognized
    pub fn output_format(&self) -> Option<OutputFormat> {
        match self.default_format.as_deref()?.trim().to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }

    /// Get the configuration file path
    fn config_path() -> Result<PathBuf> {
        let home = dirs_next::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".config").join("spot-advisor").join("config.json"))
    }
}
