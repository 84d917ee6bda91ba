#![warn(clippy::all, clippy::pedantic)]

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

// Global configuration instance with thread-safe access
pub static CONFIG: once_cell::sync::Lazy<Arc<RwLock<Config>>> =
    once_cell::sync::Lazy::new(|| Arc::new(RwLock::new(Config::default())));

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub audio: AudioConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    pub music_enabled: bool,
    pub sound_enabled: bool,
    pub volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            music_enabled: true,
            sound_enabled: true,
            volume: 0.5,
        }
    }
}

/// Loads the configuration file into the global handle, writing a default
/// file on first run. A missing or unparsable file falls back to defaults.
pub fn load() -> Result<(), ConfigError> {
    let path = config_file_path();

    if !path.exists() {
        let default_config = Config::default();
        save(&default_config)?;
        info!("Wrote default configuration to {path:?}");
        return Ok(());
    }

    let contents = fs::read_to_string(&path)?;
    match toml::from_str::<Config>(&contents) {
        Ok(config) => {
            let mut global = CONFIG.write().unwrap_or_else(std::sync::PoisonError::into_inner);
            *global = config;
            Ok(())
        }
        Err(e) => {
            warn!("Invalid configuration in {path:?}, using defaults: {e}");
            Err(ConfigError::Parse(e))
        }
    }
}

/// Writes the configuration to disk.
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let path = config_file_path();

    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let toml_string = toml::to_string_pretty(config)?;
    fs::write(&path, toml_string)?;

    Ok(())
}

/// A clone of the current configuration.
#[must_use]
pub fn current() -> Config {
    CONFIG
        .read()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .clone()
}

// Get the path to the config file
fn config_file_path() -> PathBuf {
    // Check for environment variable override
    if let Ok(path) = std::env::var("TETRACUBE_CONFIG") {
        return PathBuf::from(path);
    }

    // Otherwise use default path in user's config directory
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("tetracube").join("config.toml")
    } else {
        // Fallback to local directory
        PathBuf::from("config/tetracube.toml")
    }
}

// Custom error type for configuration operations
#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::Serialize(err)
    }
}
