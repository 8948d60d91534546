//! Configuration management for voice-clips.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{
        APPLICATION, CaptureSettings, LoggingConfig, ORGANIZATION, QUALIFIER, StopwatchConfig,
        StorageConfig, default_log_filter,
    },
};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::Path,
};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Main configuration struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Recording and name store locations.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Recording format.
    #[serde(default)]
    pub capture: CaptureSettings,
    /// Stopwatch refresh settings.
    #[serde(default)]
    pub stopwatch: StopwatchConfig,
    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from disk, creating default if not found.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let proj_dirs = Self::project_dirs()?;
        let config_dir = proj_dirs.config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            debug!(config_dir = ?config_dir, "Created config directory");
        }

        let config_path = config_dir.join("config.toml");

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            info!("No config found, creating default");
            let config = Self::with_data_dir(proj_dirs.data_dir());
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    /// Read and parse a configuration file.
    #[track_caller]
    #[instrument]
    pub fn load_from(config_path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to read config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?config_path, "Configuration loaded");

        Ok(config)
    }

    /// Defaults with every path under `data_dir`.
    pub fn with_data_dir(data_dir: &Path) -> Self {
        Config {
            storage: StorageConfig {
                recordings_dir: data_dir.join("recordings"),
                names_file: data_dir.join("names.toml"),
            },
            capture: CaptureSettings::default(),
            stopwatch: StopwatchConfig::default(),
            logging: LoggingConfig {
                filter: default_log_filter(),
                log_dir: data_dir.join("logs"),
            },
        }
    }

    /// Save configuration to `config_path` using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save_to(&self, config_path: &Path) -> AppResult<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let temp_path = config_path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?config_path, "Configuration saved (atomic write)");

        Ok(())
    }

    #[track_caller]
    fn project_dirs() -> AppResult<ProjectDirs> {
        ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION).ok_or_else(|| {
            AppError::ConfigError {
                reason: "Failed to get project directories".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }
}
