//! Application configuration
//!
//! The only thing worth configuring is where records live: a data directory
//! and one file name per record kind. Configuration is read from a TOML file.

use crate::store::RecordKind;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Storage locations for the CSV record store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the record files
    pub data_dir: PathBuf,

    pub users_file: String,
    pub bicycles_file: String,
    pub movements_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            users_file: "users.csv".to_string(),
            bicycles_file: "bicycles.csv".to_string(),
            movements_file: "movements.csv".to_string(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// Missing keys fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized or the file
    /// cannot be written.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))
    }

    /// Same configuration rooted at another data directory
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Full path of the file holding records of `kind`
    pub fn path_for(&self, kind: RecordKind) -> PathBuf {
        let file = match kind {
            RecordKind::User => &self.users_file,
            RecordKind::Bicycle => &self.bicycles_file,
            RecordKind::Movement => &self.movements_file,
        };
        self.data_dir.join(file)
    }
}
