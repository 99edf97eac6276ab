// SPDX-License-Identifier: MPL-2.0

use crate::config::{APP_ID, DEFAULT_PAGE_LIMIT, FILTER_REFRESH_INTERVAL};
use crate::feed::DeduplicationPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("settings io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Tunables for loaders and the filter service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    #[serde(default = "default_filter_refresh_secs")]
    pub filter_refresh_secs: u64,
    #[serde(default)]
    pub dedup_policy: DeduplicationPolicy,
    /// Fetch server-grouped notifications instead of individual ones
    #[serde(default)]
    pub use_grouped_notifications: bool,
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
}

fn default_filter_refresh_secs() -> u64 {
    FILTER_REFRESH_INTERVAL.as_secs()
}

fn default_page_limit() -> u32 {
    DEFAULT_PAGE_LIMIT
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            filter_refresh_secs: default_filter_refresh_secs(),
            dedup_policy: DeduplicationPolicy::default(),
            use_grouped_notifications: false,
            page_limit: default_page_limit(),
        }
    }
}

impl EngineSettings {
    pub fn filter_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.filter_refresh_secs.max(1))
    }

    /// Get the settings file path (~/.config/io.github.sethcottle.Mastofeed/settings.json)
    fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push(APP_ID);
            p.push("settings.json");
            p
        })
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            return Self::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<(), SettingsError> {
        let path = Self::settings_path().ok_or(SettingsError::NoConfigDir)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;

        Ok(())
    }
}
