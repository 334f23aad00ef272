use crate::notifications::DEFAULT_NOTIFICATION_SECS;
use crate::ticker::{DEFAULT_CLOCK_MS, DEFAULT_TICK_MS};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name looked up in the data directory when no --config is given
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// User settings stored in config.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Display clock period
    pub clock_interval_ms: u64,
    /// How long the event loop waits for input before ticking
    pub poll_interval_ms: u64,
    /// How long info messages stay visible
    pub notification_secs: u64,
    /// Size of the manual +/- correction
    pub adjust_step_minutes: i64,
    /// Where exports go (defaults to the current directory)
    pub export_dir: Option<PathBuf>,
    /// Save in the background after every committed change
    pub autosave: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            clock_interval_ms: DEFAULT_CLOCK_MS,
            poll_interval_ms: DEFAULT_TICK_MS,
            notification_secs: DEFAULT_NOTIFICATION_SECS,
            adjust_step_minutes: 15,
            export_dir: None,
            autosave: false,
        }
    }
}

impl Config {
    /// Load settings from an explicit file (must exist) or from
    /// `<data_dir>/config.toml` (optional; defaults if missing)
    pub fn load(explicit: Option<&Path>, data_dir: &Path) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = data_dir.join(CONFIG_FILE_NAME);
                if !path.exists() {
                    return Ok(Self::default());
                }
                Self::from_file(&path)
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    pub fn clock_interval(&self) -> Duration {
        Duration::from_millis(self.clock_interval_ms.max(1))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_secs(self.notification_secs)
    }

    pub fn adjust_step(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.adjust_step_minutes.abs())
    }

    /// Export directory, falling back to the current directory
    pub fn resolved_export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
