//! Well-known file names inside a clasp project.

use std::path::Path;

/// Files clasp reads or writes by a fixed name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectPath {
    /// The `.clasp.json` settings file (project directory)
    Settings,
    /// The `.claspignore` pattern file (project directory)
    IgnoreFile,
    /// The `appsscript.json` manifest (root directory)
    Manifest,
}

impl ProjectPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Settings => ".clasp.json",
            Self::IgnoreFile => ".claspignore",
            Self::Manifest => "appsscript.json",
        }
    }
}

/// Basename of the manifest as it appears on the remote side.
pub const MANIFEST_NAME: &str = "appsscript";

impl AsRef<Path> for ProjectPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for ProjectPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for ProjectPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
