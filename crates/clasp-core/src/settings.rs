//! Project settings (`.clasp.json`)
//!
//! Settings are loaded once per command into a [`Project`] handle that is
//! passed explicitly to the scanner, sync engine and lifecycle manager.

use std::path::{Path, PathBuf};

use clasp_fs::{ConfigStore, NormalizedPath, ProjectPath, io};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Local extension used for SERVER_JS files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptExtension {
    #[default]
    Gs,
    Js,
}

impl ScriptExtension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gs => "gs",
            Self::Js => "js",
        }
    }
}

impl std::str::FromStr for ScriptExtension {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim_start_matches('.').to_lowercase().as_str() {
            "gs" => Ok(Self::Gs),
            "js" => Ok(Self::Js),
            other => Err(Error::InvalidSetting {
                key: "fileExtension".to_string(),
                message: format!("expected gs or js, got {}", other),
            }),
        }
    }
}

/// Contents of `.clasp.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    #[serde(default)]
    pub script_id: String,

    /// Local root, relative to the project directory or absolute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_dir: Option<String>,

    /// Cloud project id, set by `logs --setup`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_extension: Option<ScriptExtension>,

    /// Relative paths pushed ahead of everything else, in this order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_push_order: Vec<String>,
}

impl ProjectSettings {
    pub fn new(script_id: impl Into<String>) -> Self {
        Self {
            script_id: script_id.into(),
            ..Self::default()
        }
    }

    pub fn with_root_dir(mut self, root_dir: impl Into<String>) -> Self {
        self.root_dir = Some(root_dir.into());
        self
    }

    pub fn script_extension(&self) -> ScriptExtension {
        self.file_extension.unwrap_or_default()
    }

    /// Read one key by its `.clasp.json` name
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = match key {
            "scriptId" => Some(self.script_id.clone()),
            "rootDir" => self.root_dir.clone(),
            "projectId" => self.project_id.clone(),
            "fileExtension" => self.file_extension.map(|e| e.as_str().to_string()),
            "filePushOrder" => {
                (!self.file_push_order.is_empty()).then(|| self.file_push_order.join(","))
            }
            _ => return Err(unknown_key(key)),
        };
        Ok(value)
    }

    /// Update one key by its `.clasp.json` name
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "scriptId" => {
                if value.trim().is_empty() {
                    return Err(Error::InvalidSetting {
                        key: key.to_string(),
                        message: "must not be empty".to_string(),
                    });
                }
                self.script_id = value.trim().to_string();
            }
            "rootDir" => self.root_dir = Some(value.to_string()),
            "projectId" => self.project_id = Some(value.trim().to_string()),
            "fileExtension" => self.file_extension = Some(value.parse()?),
            "filePushOrder" => {
                self.file_push_order = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| NormalizedPath::new(s).to_string())
                    .collect();
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> Error {
    Error::InvalidSetting {
        key: key.to_string(),
        message: "unknown setting".to_string(),
    }
}

/// A loaded project: the directory holding `.clasp.json` and its settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    dir: PathBuf,
    pub settings: ProjectSettings,
}

impl Project {
    pub fn new(dir: impl Into<PathBuf>, settings: ProjectSettings) -> Self {
        Self {
            dir: dir.into(),
            settings,
        }
    }

    pub fn settings_path(dir: &Path) -> NormalizedPath {
        NormalizedPath::new(dir.join(ProjectPath::Settings.as_str()))
    }

    /// Load settings from exactly `dir`
    ///
    /// # Errors
    ///
    /// - [`Error::SettingsNotFound`] when `dir` holds no settings file
    /// - [`Error::MissingScriptId`] when the file carries no script id
    pub fn load(dir: &Path) -> Result<Self> {
        let path = Self::settings_path(dir);
        if !path.is_file() {
            return Err(Error::SettingsNotFound {
                path: dir.to_path_buf(),
            });
        }

        let settings: ProjectSettings = ConfigStore::new().load(&path)?;
        if settings.script_id.trim().is_empty() {
            return Err(Error::MissingScriptId {
                path: path.to_native(),
            });
        }
        Ok(Self::new(dir, settings))
    }

    /// Load settings from `cwd` or the nearest parent that has them
    pub fn find(cwd: &Path) -> Result<Self> {
        let start = io::canonical_dir(cwd)?;
        let mut current = Some(start.as_path());
        while let Some(dir) = current {
            if Self::settings_path(dir).is_file() {
                tracing::debug!(dir = %dir.display(), "found project settings");
                return Self::load(dir);
            }
            current = dir.parent();
        }
        Err(Error::SettingsNotFound {
            path: cwd.to_path_buf(),
        })
    }

    /// Write settings for a new project, refusing to overwrite existing ones
    pub fn init(dir: &Path, settings: ProjectSettings) -> Result<Self> {
        let path = Self::settings_path(dir);
        if path.exists() {
            return Err(Error::ProjectExists {
                path: path.to_native(),
            });
        }
        let project = Self::new(dir, settings);
        project.save()?;
        Ok(project)
    }

    pub fn save(&self) -> Result<()> {
        ConfigStore::new().save(&Self::settings_path(&self.dir), &self.settings)?;
        Ok(())
    }

    /// Directory holding `.clasp.json` and `.claspignore`
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn script_id(&self) -> &str {
        &self.settings.script_id
    }

    /// Root directory whose files are synchronized
    pub fn root_dir(&self) -> PathBuf {
        match self.settings.root_dir.as_deref() {
            None | Some("") => self.dir.clone(),
            Some(root) => self.dir.join(root),
        }
    }
}
