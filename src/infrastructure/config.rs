//! Optional TOML configuration (`rwinfra.toml`).
//!
//! Every field has a default, so a missing file or a partial file is fine.
//! Command-line flags are applied on top of the loaded values by the binary.

use super::persistence::TableWriter;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "rwinfra.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding every file the tool writes.
    pub data_dir: PathBuf,
    pub cities_file: String,
    pub roads_file: String,
    /// JSON snapshot used by save/load.
    pub snapshot_file: String,
    pub csv_file: String,
    /// Start from the built-in city network instead of an empty registry.
    pub seed: bool,
    /// Log destination; logging is off when unset.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            cities_file: "cities.txt".to_string(),
            roads_file: "roads.txt".to_string(),
            snapshot_file: "registry.json".to_string(),
            csv_file: "roads.csv".to_string(),
            seed: true,
            log_file: None,
        }
    }
}

impl Config {
    /// Loads `explicit` if given, else `rwinfra.toml` in the working
    /// directory if it exists, else the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = Path::new(CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn cities_path(&self) -> PathBuf {
        self.data_dir.join(&self.cities_file)
    }

    pub fn roads_path(&self) -> PathBuf {
        self.data_dir.join(&self.roads_file)
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(&self.snapshot_file)
    }

    pub fn csv_path(&self) -> PathBuf {
        self.data_dir.join(&self.csv_file)
    }

    pub fn table_writer(&self) -> TableWriter {
        TableWriter::new(self.cities_path(), self.roads_path())
    }
}
