use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use ingestion_core::AppState;
use ingestion_engine::{DEFAULT_STEP_DELAY, DEFAULT_TOTAL_STEPS};
use ingestion_logging::{ingest_info, ingest_warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub(crate) const SETTINGS_FILENAME: &str = ".ingestion_settings.ron";

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid settings: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("total_steps must be at least 1")]
    ZeroSteps,
}

/// Shape of the simulated upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct UploadSettings {
    pub total_steps: u32,
    pub step_delay_ms: u64,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            total_steps: DEFAULT_TOTAL_STEPS,
            step_delay_ms: DEFAULT_STEP_DELAY.as_millis() as u64,
        }
    }
}

impl UploadSettings {
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.total_steps == 0 {
            return Err(ConfigError::ZeroSteps);
        }
        Ok(self)
    }

    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    pub fn initial_state(&self) -> AppState {
        AppState::with_plan(self.total_steps, self.step_delay())
    }
}

/// Reads `{dir}/.ingestion_settings.ron`. `Ok(None)` when the file is absent.
pub(crate) fn read_settings(dir: &Path) -> Result<Option<UploadSettings>, ConfigError> {
    let path = dir.join(SETTINGS_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let settings: UploadSettings = ron::from_str(&content)?;
    settings.validate().map(Some)
}

/// Like [`read_settings`], but any problem falls back to the defaults.
pub(crate) fn load_settings(dir: &Path) -> UploadSettings {
    match read_settings(dir) {
        Ok(Some(settings)) => {
            ingest_info!("Loaded settings from {:?}: {:?}", dir, settings);
            settings
        }
        Ok(None) => UploadSettings::default(),
        Err(err) => {
            ingest_warn!("Ignoring settings in {:?}: {}", dir, err);
            UploadSettings::default()
        }
    }
}
