#![warn(clippy::all, clippy::pedantic)]

use bevy_ecs::prelude::Resource;
use log::{error, info, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::leaderboard::{Leaderboard, SavedProgress};

const LEADERBOARD_FILE: &str = "leaderboard.toml";
const SNAPSHOT_FILE: &str = "savegame.toml";

/// On-disk store for the leaderboard and the resume snapshot. Reads happen
/// once at startup; every write is best effort and never fatal.
#[derive(Resource, Debug, Clone)]
pub struct Storage {
    dir: PathBuf,
    pub leaderboard: Leaderboard,
    pub snapshot: Option<SavedProgress>,
}

impl Storage {
    /// Opens the store in the user's data directory.
    #[must_use]
    pub fn load() -> Self {
        Self::open(data_dir())
    }

    /// Opens the store in an explicit directory.
    #[must_use]
    pub fn open(dir: PathBuf) -> Self {
        let leaderboard: Leaderboard = read_file(&dir.join(LEADERBOARD_FILE)).unwrap_or_default();
        let snapshot: Option<SavedProgress> = read_file(&dir.join(SNAPSHOT_FILE));

        info!(
            "Storage opened at {:?}: {} leaderboard entries, snapshot: {}",
            dir,
            leaderboard.entries.len(),
            snapshot.is_some()
        );

        Self {
            dir,
            leaderboard,
            snapshot,
        }
    }

    pub fn save_leaderboard(&self) {
        if let Err(e) = write_file(&self.dir.join(LEADERBOARD_FILE), &self.leaderboard) {
            error!("Failed to save leaderboard: {e:?}");
        }
    }

    pub fn save_snapshot(&mut self, progress: SavedProgress) {
        if let Err(e) = write_file(&self.dir.join(SNAPSHOT_FILE), &progress) {
            error!("Failed to save progress snapshot: {e:?}");
        }
        self.snapshot = Some(progress);
    }

    /// Discards the resume snapshot, on disk and in memory.
    pub fn clear_snapshot(&mut self) {
        let path = self.dir.join(SNAPSHOT_FILE);
        if path.exists() {
            if let Err(e) = fs::remove_file(&path) {
                error!("Failed to remove snapshot file: {e:?}");
            }
        }
        self.snapshot = None;
    }

    #[must_use]
    pub fn has_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }
}

/// Reads and parses a TOML file. Any failure is logged and treated as
/// "no saved data".
fn read_file<T: DeserializeOwned>(path: &Path) -> Option<T> {
    if !path.exists() {
        return None;
    }

    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            warn!("Failed to read {path:?}: {e}");
            return None;
        }
    };

    match toml::from_str(&contents) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Failed to parse {path:?}, ignoring saved data: {e}");
            None
        }
    }
}

fn write_file<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let toml_string = toml::to_string_pretty(value)?;
    fs::write(path, toml_string)?;

    Ok(())
}

/// Data directory, overridable for tests and portable installs.
fn data_dir() -> PathBuf {
    if let Ok(path) = std::env::var("TETRACUBE_DATA_DIR") {
        return PathBuf::from(path);
    }

    if let Some(dir) = dirs::data_dir() {
        dir.join("tetracube")
    } else {
        PathBuf::from(".tetracube")
    }
}

// Custom error type for storage operations
#[derive(Debug)]
pub enum StorageError {
    Io(io::Error),
    Serialize(toml::ser::Error),
}

impl From<io::Error> for StorageError {
    fn from(err: io::Error) -> Self {
        StorageError::Io(err)
    }
}

impl From<toml::ser::Error> for StorageError {
    fn from(err: toml::ser::Error) -> Self {
        StorageError::Serialize(err)
    }
}
