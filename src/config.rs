//! User-tunable scheduler defaults, persisted in the OS config directory.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Longest minimum period honored, about ten years. Larger settings are
/// clamped so widening never leaves the calendar.
pub const MAX_PERIOD_DAYS: i64 = 3660;

/// Defaults applied to newly created periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub period_name: String,
    pub period_color: String,
    /// Shortest allowed period, in days. Clamped to `1..=MAX_PERIOD_DAYS`.
    pub min_period_days: i64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            period_name: "Trial run".into(),
            period_color: "#FF69B4".into(),
            min_period_days: 1,
        }
    }
}

impl SchedulerConfig {
    pub fn min_days(&self) -> i64 {
        self.min_period_days.clamp(1, MAX_PERIOD_DAYS)
    }

    /// Location of `settings.json`.
    pub fn config_path() -> PathBuf {
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "PeriodBoard") {
            proj_dirs.config_dir().join("settings.json")
        } else {
            PathBuf::from(".").join("settings.json")
        }
    }

    /// Load from the default location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load from `path`; a missing or unreadable file yields defaults.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(s) => match serde_json::from_str::<Self>(&s) {
                Ok(config) => {
                    if !(1..=MAX_PERIOD_DAYS).contains(&config.min_period_days) {
                        warn!(
                            "min_period_days {} in {:?} is out of range, using {}",
                            config.min_period_days,
                            path,
                            config.min_days()
                        );
                    }
                    info!("loaded scheduler config from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!("ignoring malformed config {:?}: {}", path, e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        std::fs::write(path, json).map_err(|e| e.to_string())?;
        info!("wrote scheduler config to {:?}", path);
        Ok(())
    }
}
