//! Application configuration
//!
//! Read once at startup from `~/.config/progress-journal/config.json`
//! (platform equivalent via `dirs`). Every field has a default, so a
//! missing or partial file is fine.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{JournalError, Result};

const APP_DIR: &str = "progress-journal";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Override for the catalog database file
    pub database_path: Option<PathBuf>,
    /// Override for the thumbnail cache directory
    pub cache_dir: Option<PathBuf>,
    /// `env_logger` filter used when `RUST_LOG` is not set
    pub log_filter: String,
    /// Username signed in automatically at startup
    pub default_user: Option<String>,
    /// File extensions picked up by folder import (lowercase, no dot)
    pub image_extensions: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            cache_dir: None,
            log_filter: "info".to_string(),
            default_user: None,
            image_extensions: ["jpg", "jpeg", "png", "webp", "gif"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

impl AppConfig {
    /// Load the config from its default location.
    ///
    /// Runs before the logger is up, so problems are returned as a warning
    /// string for `main` to log instead of being logged here.
    pub fn load() -> (Self, Option<String>) {
        let Some(path) = Self::config_path() else {
            return (Self::default(), None);
        };

        if !path.exists() {
            return (Self::default(), None);
        }

        match Self::load_from(&path) {
            Ok(config) => (config, None),
            Err(e) => (
                Self::default(),
                Some(format!("Ignoring config at {}: {}", path.display(), e)),
            ),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.json"))
    }

    /// Resolve the catalog database path
    /// - Linux: ~/.local/share/progress-journal/journal.db
    /// - macOS: ~/Library/Application Support/progress-journal/journal.db
    /// - Windows: %APPDATA%\progress-journal\journal.db
    pub fn database_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }

        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or(JournalError::NoDataDir)?;
        path.push(APP_DIR);
        path.push("journal.db");
        Ok(path)
    }

    /// Resolve the thumbnail cache directory
    /// Returns ~/.cache/progress-journal/thumbnails on Linux
    pub fn thumbnail_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.cache_dir {
            return Ok(dir.join("thumbnails"));
        }

        let mut path = dirs::cache_dir()
            .or_else(dirs::home_dir)
            .ok_or(JournalError::NoDataDir)?;
        path.push(APP_DIR);
        path.push("thumbnails");
        Ok(path)
    }

    /// Whether a file extension is accepted by folder import
    pub fn accepts_extension(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        self.image_extensions.iter().any(|known| *known == ext)
    }
}
