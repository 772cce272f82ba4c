//! Ignore matcher compiled from `.claspignore`
//!
//! Patterns use gitignore syntax: later patterns override earlier ones and a
//! leading `!` re-includes a path excluded before. The root manifest can
//! never be ignored.

use std::path::{Path, PathBuf};

use clasp_fs::{NormalizedPath, ProjectPath, io};
use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::{Error, Result};

/// Patterns used when the project has no `.claspignore`
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    ".git/",
    ".svn/",
    ".hg/",
    "node_modules/",
    "bower_components/",
];

/// Compiled ignore rules for one root directory
#[derive(Debug, Clone)]
pub struct IgnoreMatcher {
    gitignore: Gitignore,
    patterns: Vec<String>,
}

impl IgnoreMatcher {
    /// Compile `patterns` for paths relative to `root`
    ///
    /// # Errors
    ///
    /// Returns [`Error::IgnorePattern`] for the first pattern that does not
    /// compile.
    pub fn new<S: AsRef<str>>(root: &Path, patterns: &[S]) -> Result<Self> {
        let mut builder = GitignoreBuilder::new(root);
        let mut kept = Vec::new();
        for pattern in patterns {
            let line = pattern.as_ref().trim_end();
            builder
                .add_line(None, line)
                .map_err(|e| Error::IgnorePattern {
                    pattern: line.to_string(),
                    message: e.to_string(),
                })?;
            if !line.is_empty() && !line.starts_with('#') {
                kept.push(line.to_string());
            }
        }
        let gitignore = builder.build().map_err(|e| Error::IgnorePattern {
            pattern: kept.join(", "),
            message: e.to_string(),
        })?;

        Ok(Self {
            gitignore,
            patterns: kept,
        })
    }

    /// Matcher with [`DEFAULT_IGNORE_PATTERNS`]
    pub fn with_defaults(root: &Path) -> Result<Self> {
        Self::new(root, DEFAULT_IGNORE_PATTERNS)
    }

    /// Read `.claspignore` from `project_dir`, or fall back to the defaults
    pub fn load(project_dir: &Path, root: &Path) -> Result<Self> {
        let path = Self::ignore_file(project_dir);
        if !path.is_file() {
            tracing::debug!("no {} found, using default patterns", ProjectPath::IgnoreFile);
            return Self::with_defaults(root);
        }

        let content = io::read_text(&NormalizedPath::new(&path))?;
        let lines: Vec<&str> = content.lines().collect();
        tracing::debug!(path = %path.display(), patterns = lines.len(), "loaded ignore file");
        Self::new(root, lines.as_slice())
    }

    pub fn ignore_file(project_dir: &Path) -> PathBuf {
        project_dir.join(ProjectPath::IgnoreFile.as_str())
    }

    /// Effective patterns, blank lines and comments removed
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Whether `relative_path` is excluded
    ///
    /// A path inside an excluded directory is excluded unless a later
    /// negation matches the path itself.
    pub fn is_ignored(&self, relative_path: &NormalizedPath, is_dir: bool) -> bool {
        if is_manifest(relative_path) {
            return false;
        }
        self.gitignore
            .matched_path_or_any_parents(relative_path.as_str(), is_dir)
            .is_ignore()
    }

    /// Whether some directory above `relative_path` is itself excluded
    pub fn in_ignored_dir(&self, relative_path: &NormalizedPath) -> bool {
        let mut ancestors = Vec::new();
        let mut current = relative_path.parent();
        while let Some(dir) = current {
            current = dir.parent();
            ancestors.push(dir);
        }
        ancestors
            .iter()
            .rev()
            .any(|dir| self.gitignore.matched(dir.as_str(), true).is_ignore())
    }

    /// Whether a directory walk may skip `relative_dir` entirely
    ///
    /// Only safe when no negation could re-include something below it.
    pub fn prunes_dir(&self, relative_dir: &NormalizedPath) -> bool {
        self.gitignore.num_whitelists() == 0 && self.is_ignored(relative_dir, true)
    }
}

/// The manifest lives at the root
pub fn is_manifest(relative_path: &NormalizedPath) -> bool {
    relative_path.as_str() == ProjectPath::Manifest.as_str()
}

/// A file named like the manifest somewhere below the root
pub fn is_nested_manifest(relative_path: &NormalizedPath) -> bool {
    relative_path.depth() > 1 && relative_path.file_name() == Some(ProjectPath::Manifest.as_str())
}
