//! Configuration management for formcapture.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::form::{Capability, Position};
use crate::storage::DATABASE_FILE_NAME;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "formcapture";

/// Default photo directory name, inside the data directory.
const PHOTO_DIR_NAME: &str = "pictures";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `FORMCAPTURE_`, sections separated
///    by `__`, e.g. `FORMCAPTURE_STORAGE__DATABASE_PATH`)
/// 2. TOML config file at `~/.config/formcapture/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Photo capture configuration.
    pub capture: CaptureConfig,
    /// Capabilities granted to the desktop host.
    pub permissions: PermissionsConfig,
    /// Fixed position reported by the desktop host.
    pub location: LocationConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/formcapture/formdata.db`
    pub database_path: Option<PathBuf>,
}

/// Photo capture configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Directory captured photos are written to.
    /// Defaults to `~/.local/share/formcapture/pictures`
    pub photo_dir: Option<PathBuf>,
}

/// Which capabilities the desktop permission gate grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionsConfig {
    /// Allow photo capture.
    pub camera: bool,
    /// Allow location lookups.
    pub location: bool,
}

/// Last-known position the desktop host reports.
///
/// Both or neither coordinate must be set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    /// Latitude in degrees.
    pub latitude: Option<f64>,
    /// Longitude in degrees.
    pub longitude: Option<f64>,
}

impl Default for PermissionsConfig {
    fn default() -> Self {
        Self {
            camera: true,
            location: true,
        }
    }
}

impl PermissionsConfig {
    /// Whether `capability` is granted.
    #[must_use]
    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::Camera => self.camera,
            Capability::Location => self.location,
        }
    }
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("FORMCAPTURE_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Check a single configuration file on its own.
    ///
    /// Unlike [`load_from`](Self::load_from), a missing file is an error and
    /// environment overrides are not applied, so the result reflects only
    /// what the file says on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, [`Error::ConfigLoad`]
    /// if it does not parse, or [`Error::ConfigValidation`] if a value is out
    /// of range.
    pub fn check_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::string(&contents))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        match (self.location.latitude, self.location.longitude) {
            (Some(_), None) | (None, Some(_)) => {
                return Err(Error::ConfigValidation {
                    message: "location.latitude and location.longitude must be set together"
                        .to_string(),
                });
            }
            (Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) {
                    return Err(Error::ConfigValidation {
                        message: format!("location.latitude ({lat}) must be within [-90, 90]"),
                    });
                }
                if !(-180.0..=180.0).contains(&lon) {
                    return Err(Error::ConfigValidation {
                        message: format!(
                            "location.longitude ({lon}) must be within [-180, 180]"
                        ),
                    });
                }
            }
            (None, None) => {}
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the photo directory, resolving defaults if not set.
    #[must_use]
    pub fn photo_dir(&self) -> PathBuf {
        self.capture
            .photo_dir
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(PHOTO_DIR_NAME))
    }

    /// Get the configured fixed position, if any.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        match (self.location.latitude, self.location.longitude) {
            (Some(latitude), Some(longitude)) => Some(Position {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }
}
