//! Application Settings
//!
//! Process-level settings: end-of-catalog policy, timing overrides, storage
//! location and log filter. Read from a hand-edited TOML file in the config
//! directory; the program never writes it.

use crate::constants::SETTINGS_FILE_NAME;
use crate::error::Result;
use crate::helpers::{get_or_create_config_dir, get_or_create_data_dir};
use crate::sequencer::{EndOfCatalog, SequencerTiming};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, info};

const DEFAULT_LOG_FILTER: &str = "info";

/// Location of the settings file, which may not exist
pub fn settings_path() -> Result<PathBuf> {
    Ok(get_or_create_config_dir()?.join(SETTINGS_FILE_NAME))
}

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    end_of_catalog: Option<EndOfCatalog>,
    /// Loading phase length in milliseconds
    loading_delay_ms: Option<u64>,
    /// Directory holding the widget config record
    storage_dir: Option<PathBuf>,
    /// `tracing` filter directive, e.g. `chroma_demo=debug`
    log_filter: Option<String>,
}

impl AppSettings {
    /// Load settings from the config directory
    pub fn try_load() -> Result<Self> {
        Self::load_from(&settings_path()?)
    }

    /// Load settings from `path`; a missing or empty file means defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = ?path, "No settings file, using defaults");
            return Ok(Self::new());
        }
        info!(path = ?path, "Loading settings file");
        let value = std::fs::read_to_string(path)?;

        if value.trim().is_empty() {
            return Ok(Self::new());
        }

        let settings: Self = toml::from_str(&value).map_err(|e| {
            error!(error = %e, path = ?path, "Failed to parse settings file");
            e
        })?;

        Ok(settings)
    }

    /// Create new default settings
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Getters ====================

    pub fn end_of_catalog(&self) -> EndOfCatalog {
        self.end_of_catalog.unwrap_or_default()
    }

    pub fn loading_delay(&self) -> Option<Duration> {
        self.loading_delay_ms.map(Duration::from_millis)
    }

    /// Storage directory, the platform data directory unless overridden
    pub fn storage_dir(&self) -> Result<PathBuf> {
        match &self.storage_dir {
            Some(dir) => Ok(dir.clone()),
            None => get_or_create_data_dir(),
        }
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    /// Apply the overrides to `timing`
    pub fn apply(&self, timing: SequencerTiming) -> SequencerTiming {
        let timing = timing.with_end_of_catalog(self.end_of_catalog());
        match self.loading_delay() {
            Some(delay) => timing.with_loading_delay(delay),
            None => timing,
        }
    }
}
