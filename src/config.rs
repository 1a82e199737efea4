// SPDX-License-Identifier: GPL-3.0-only

//! User configuration with JSON persistence

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use crate::backends::types::{DeviceKind, DevicePosition, SessionPreset};
use crate::constants::{APP_ID, CONFIG_FILE_NAME, DEFAULT_COMPLETION_TIMEOUT_SECS};
use crate::pipeline::capabilities::CaptureTier;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Physical position of the capture device to select
    pub device_position: DevicePosition,
    /// Kind of capture device to select
    pub device_kind: DeviceKind,
    /// Session preset applied during bootstrap
    pub session_preset: SessionPreset,
    /// Tier preselected in the tier selector
    pub default_tier: CaptureTier,
    /// Bound on in-flight capture duration in seconds; `None` disables the bound
    pub completion_timeout_secs: Option<u64>,
    /// Directory the file asset library writes into; `None` uses the
    /// system pictures directory
    pub library_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device_position: DevicePosition::Back,
            device_kind: DeviceKind::WideAngle,
            session_preset: SessionPreset::Photo,
            default_tier: CaptureTier::Photo,
            completion_timeout_secs: Some(DEFAULT_COMPLETION_TIMEOUT_SECS),
            library_dir: None,
        }
    }
}

impl Config {
    /// Path of the config file (`<config_dir>/raw-capture/config.json`)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_ID).join(CONFIG_FILE_NAME))
    }

    /// Load the config file, falling back to defaults when it is missing
    /// or unreadable.
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => config,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "Invalid config file, using defaults");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Write the config file, creating the directory if needed.
    pub fn save(&self) -> std::io::Result<()> {
        let Some(path) = Self::path() else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, contents)
    }

    /// The completion timeout as a `Duration`, if bounded
    pub fn completion_timeout(&self) -> Option<Duration> {
        self.completion_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_targets_back_wide_angle() {
        let config = Config::default();
        assert_eq!(config.device_position, DevicePosition::Back);
        assert_eq!(config.device_kind, DeviceKind::WideAngle);
        assert_eq!(config.default_tier, CaptureTier::Photo);
    }

    #[test]
    fn default_timeout_is_bounded() {
        let config = Config::default();
        assert_eq!(
            config.completion_timeout(),
            Some(Duration::from_secs(DEFAULT_COMPLETION_TIMEOUT_SECS)),
            "in-flight captures should be bounded by default"
        );
    }

    #[test]
    fn config_round_trips_through_json() {
        let mut config = Config::default();
        config.default_tier = CaptureTier::Raw;
        config.completion_timeout_secs = None;

        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
