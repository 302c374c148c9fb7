//! # Configuration
//!
//! Scribe configuration uses [`confique`], layered as:
//!
//! 1. **Environment variables**: `SCRIBE_NOTES_URL`, `SCRIBE_USERS_URL`,
//!    `SCRIBE_AUTOSAVE_MS`, `SCRIBE_REQUEST_TIMEOUT_SECS`.
//! 2. **Config file**: `scribe.toml` in the OS config directory (via the
//!    `directories` crate), or in `$SCRIBE_CONFIG_DIR` when set.
//! 3. **Compiled defaults**: `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `notes_url` | `http://localhost:3002/api/notes` | Notes service mount point |
//! | `users_url` | `http://localhost:3001` | Users service base URL |
//! | `autosave_ms` | `2000` | Quiet period before an autosave |
//! | `request_timeout_secs` | `30` | Per-request timeout |
//!
//! The session token lives next to other user data, in `token` under the OS
//! data directory or `$SCRIBE_DATA_DIR`.

use crate::error::{Result, ScribeError};
use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE: &str = "scribe.toml";
pub const TOKEN_FILE: &str = "token";
pub const CONFIG_DIR_ENV: &str = "SCRIBE_CONFIG_DIR";
pub const DATA_DIR_ENV: &str = "SCRIBE_DATA_DIR";

/// Configuration for scribe, stored in `scribe.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ScribeConfig {
    /// Base URL the notes service is mounted at.
    #[config(default = "http://localhost:3002/api/notes", env = "SCRIBE_NOTES_URL")]
    pub notes_url: String,

    /// Base URL of the users service (register and login).
    #[config(default = "http://localhost:3001", env = "SCRIBE_USERS_URL")]
    pub users_url: String,

    /// Milliseconds without edits before the draft is saved.
    #[config(default = 2000, env = "SCRIBE_AUTOSAVE_MS")]
    pub autosave_ms: u64,

    /// Seconds before a request to either service is abandoned.
    #[config(default = 30, env = "SCRIBE_REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: u64,
}

impl Default for ScribeConfig {
    fn default() -> Self {
        Self {
            notes_url: "http://localhost:3002/api/notes".to_string(),
            users_url: "http://localhost:3001".to_string(),
            autosave_ms: 2000,
            request_timeout_secs: 30,
        }
    }
}

impl ScribeConfig {
    /// Load from the environment and `path`. A missing file is not an error.
    pub fn load(path: &Path) -> Result<Self> {
        let config = Self::builder().env().file(path).load()?;
        config.validate()?;
        Ok(config)
    }

    pub fn autosave(&self) -> Duration {
        Duration::from_millis(self.autosave_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        for (key, url) in [("notes_url", &self.notes_url), ("users_url", &self.users_url)] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ScribeError::Config(format!(
                    "{} must be an http(s) URL, got \"{}\"",
                    key, url
                )));
            }
        }
        if self.request_timeout_secs == 0 {
            return Err(ScribeError::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// A commented `scribe.toml` listing every setting and its default.
    pub fn template() -> String {
        confique::toml::template::<Self>(confique::toml::FormatOptions::default())
    }
}

/// Where scribe keeps its config file and token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScribePaths {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl ScribePaths {
    /// OS directories, each overridable through its environment variable.
    pub fn resolve() -> Result<Self> {
        let config_override = std::env::var_os(CONFIG_DIR_ENV).map(PathBuf::from);
        let data_override = std::env::var_os(DATA_DIR_ENV).map(PathBuf::from);
        Self::with_overrides(config_override, data_override)
    }

    pub fn with_overrides(config_dir: Option<PathBuf>, data_dir: Option<PathBuf>) -> Result<Self> {
        if let (Some(config_dir), Some(data_dir)) = (&config_dir, &data_dir) {
            return Ok(Self {
                config_dir: config_dir.clone(),
                data_dir: data_dir.clone(),
            });
        }
        let dirs = ProjectDirs::from("", "", "scribe").ok_or_else(|| {
            ScribeError::Config("Could not determine a home directory".to_string())
        })?;
        Ok(Self {
            config_dir: config_dir.unwrap_or_else(|| dirs.config_dir().to_path_buf()),
            data_dir: data_dir.unwrap_or_else(|| dirs.data_dir().to_path_buf()),
        })
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    pub fn token_file(&self) -> PathBuf {
        self.data_dir.join(TOKEN_FILE)
    }
}
