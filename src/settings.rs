//! User settings.
//!
//! Settings live in a JSON file in the platform config directory. The
//! backend address can also come from the `LAPVIEW_API_URL` environment
//! variable, which wins over the file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::analysis::scale::DEFAULT_VIEWPORT_WIDTH;
use crate::api::client::DEFAULT_API_BASE;

/// Environment variable overriding the backend address
pub const API_URL_ENV: &str = "LAPVIEW_API_URL";

/// Errors that can occur while saving settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory: {0}")]
    CreateDir(std::io::Error),

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write settings file: {0}")]
    Write(std::io::Error),
}

/// User settings that persist across runs
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Settings file version for migration support
    #[serde(default = "default_version")]
    pub version: u32,
    /// Backend base URL; `None` uses the default
    #[serde(default)]
    pub api_base_url: Option<String>,
    /// Hide outlier laps from the chart by default
    #[serde(default = "default_exclude_outliers")]
    pub exclude_outliers: bool,
    /// Viewport width used when rendering charts outside a browser
    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,
}

fn default_version() -> u32 {
    1
}

fn default_exclude_outliers() -> bool {
    true
}

fn default_viewport_width() -> u32 {
    DEFAULT_VIEWPORT_WIDTH
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            api_base_url: None,
            exclude_outliers: default_exclude_outliers(),
            viewport_width: default_viewport_width(),
        }
    }
}

impl Settings {
    /// Get the config directory path for LapView
    pub fn get_config_dir() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::data_dir().map(|p| p.join("LapView"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|p| p.join("LapView"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            dirs::config_dir().map(|p| p.join("lapview"))
        }
    }

    /// Get the path to the settings JSON file
    pub fn get_settings_path() -> Option<PathBuf> {
        Self::get_config_dir().map(|p| p.join("settings.json"))
    }

    /// Load settings from the default location
    pub fn load() -> Self {
        match Self::get_settings_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load settings from a file; a missing or unreadable file gives defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed settings file {:?}: {}", path, e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!("Failed to read settings file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Save settings to the default location
    pub fn save(&self) -> Result<(), SettingsError> {
        let path = Self::get_settings_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Save settings to a file, creating its directory
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(SettingsError::CreateDir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(SettingsError::Write)?;

        Ok(())
    }

    /// Backend address, honouring the environment override
    pub fn api_base_url(&self) -> String {
        self.api_base_url_with(std::env::var(API_URL_ENV).ok())
    }

    /// Backend address given an explicit override value
    pub fn api_base_url_with(&self, env_override: Option<String>) -> String {
        env_override
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.api_base_url.clone())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
    }
}
