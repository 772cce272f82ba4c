//! Client configuration
//!
//! Optional `config.toml` in the platform config directory:
//! - Linux: `~/.config/clasp/config.toml`
//! - macOS: `~/Library/Application Support/clasp/config.toml`
//! - Windows: `%APPDATA%\clasp\config.toml`
//!
//! ```toml
//! remote_dir = "/srv/clasp-remote"
//! default_extension = "js"
//! ```

use std::path::{Path, PathBuf};

use clasp_fs::{ConfigStore, NormalizedPath};
use serde::{Deserialize, Serialize};

use crate::settings::ScriptExtension;
use crate::{Error, Result};

const APP_DIR: &str = "clasp";
const CONFIG_FILE: &str = "config.toml";

/// User-level settings shared by all projects
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Where the local remote backend keeps project state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_dir: Option<PathBuf>,

    /// `fileExtension` written into newly created or cloned projects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_extension: Option<ScriptExtension>,
}

/// Locates and reads [`ClientConfig`]
#[derive(Debug, Clone, Default)]
pub struct ClientConfigLoader {
    /// Used instead of the platform directory when set
    config_dir_override: Option<PathBuf>,
}

impl ClientConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir_override: Some(config_dir.into()),
        }
    }

    fn config_dir(&self) -> Option<PathBuf> {
        if let Some(ref dir) = self.config_dir_override {
            return Some(dir.clone());
        }
        dirs::config_dir().map(|d| d.join(APP_DIR))
    }

    pub fn config_path(&self) -> Option<PathBuf> {
        self.config_dir().map(|d| d.join(CONFIG_FILE))
    }

    /// Load the config file, or defaults when it does not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is not valid TOML.
    pub fn load(&self) -> Result<ClientConfig> {
        let Some(path) = self.config_path() else {
            return Ok(ClientConfig::default());
        };
        if !path.is_file() {
            return Ok(ClientConfig::default());
        }
        tracing::debug!(path = %path.display(), "loading client config");
        Ok(ConfigStore::new().load(&NormalizedPath::new(&path))?)
    }

    pub fn save(&self, config: &ClientConfig) -> Result<()> {
        let path = self.config_path().ok_or_else(|| Error::InvalidSetting {
            key: CONFIG_FILE.to_string(),
            message: "no platform config directory".to_string(),
        })?;
        ConfigStore::new().save(&NormalizedPath::new(&path), config)?;
        Ok(())
    }
}

impl ClientConfig {
    /// Pick the remote directory: explicit value, then config, then the
    /// platform data directory
    pub fn resolve_remote_dir(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(dir) = explicit {
            return Ok(dir.to_path_buf());
        }
        if let Some(ref dir) = self.remote_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|d| d.join(APP_DIR).join("remote"))
            .ok_or(Error::NoRemoteDir)
    }
}
