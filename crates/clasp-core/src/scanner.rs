//! Local project scanner
//!
//! Walks the root directory and splits files into the ones that will be
//! pushed and the untracked ones. A file matched by an ignore pattern is
//! untracked whatever its extension; any other file is only considered when
//! its extension is on the allow-list, so unrelated files stay out of both
//! lists. Copies of the manifest below the root are left out of both lists
//! too, ignored or not.

use std::path::Path;

use clasp_fs::{NormalizedPath, ProjectPath, io};
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::ignore::{IgnoreMatcher, is_manifest, is_nested_manifest};
use crate::{Error, Result};

/// Extensions the scanner looks at
pub const ELIGIBLE_EXTENSIONS: &[&str] = &["gs", "js", "html", "json"];

/// Tracked and untracked files, both in scan order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileClassification {
    pub files_to_push: Vec<String>,
    pub untracked_files: Vec<String>,
}

impl FileClassification {
    pub fn has_manifest(&self) -> bool {
        self.files_to_push
            .iter()
            .any(|p| p == ProjectPath::Manifest.as_str())
    }
}

/// A file read from the root directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub relative_path: NormalizedPath,
    pub content: Vec<u8>,
}

impl LocalFile {
    pub fn new(relative_path: impl Into<NormalizedPath>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            relative_path: relative_path.into(),
            content: content.into(),
        }
    }

    pub fn extension(&self) -> Option<&str> {
        self.relative_path.extension()
    }
}

/// Classify every eligible file under `root`
///
/// # Errors
///
/// Returns [`Error::Scan`] if `root` is missing or a directory cannot be
/// read.
pub fn scan(root: &Path, matcher: &IgnoreMatcher) -> Result<FileClassification> {
    if !root.is_dir() {
        return Err(Error::Scan {
            path: root.to_path_buf(),
            message: "directory does not exist".to_string(),
        });
    }

    let mut classification = FileClassification::default();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            match NormalizedPath::relative_to(entry.path(), root) {
                Ok(rel) => !matcher.prunes_dir(&rel),
                Err(_) => true,
            }
        });

    for entry in walker {
        let entry = entry.map_err(|e| Error::Scan {
            path: e.path().unwrap_or(root).to_path_buf(),
            message: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let rel = NormalizedPath::relative_to(entry.path(), root)?;
        if is_project_metadata(&rel) {
            continue;
        }
        if is_nested_manifest(&rel) {
            tracing::debug!(path = %rel, "skipping nested manifest");
            continue;
        }

        if matcher.is_ignored(&rel, false) {
            // Contents of excluded directories are never reported, pruned or not
            if !matcher.in_ignored_dir(&rel) {
                tracing::debug!(path = %rel, "untracked");
                classification.untracked_files.push(rel.to_string());
            }
            continue;
        }

        if !rel
            .extension()
            .is_some_and(|ext| ELIGIBLE_EXTENSIONS.contains(&ext))
        {
            continue;
        }

        if is_pushable(&rel) {
            tracing::debug!(path = %rel, "tracked");
            classification.files_to_push.push(rel.to_string());
        } else {
            tracing::debug!(path = %rel, "untracked");
            classification.untracked_files.push(rel.to_string());
        }
    }

    Ok(classification)
}

/// Load the given relative paths from `root`
pub fn read_files(root: &Path, paths: &[String]) -> Result<Vec<LocalFile>> {
    paths
        .iter()
        .map(|rel| {
            let rel = NormalizedPath::new(rel);
            let full = NormalizedPath::new(root.join(rel.to_native()));
            let content = io::read_bytes(&full)?;
            Ok(LocalFile::new(rel, content))
        })
        .collect()
}

/// Script, markup, or the root manifest; other JSON stays local
fn is_pushable(rel: &NormalizedPath) -> bool {
    matches!(rel.extension(), Some("gs" | "js" | "html")) || is_manifest(rel)
}

fn is_project_metadata(rel: &NormalizedPath) -> bool {
    rel.depth() == 1
        && (rel.as_str() == ProjectPath::Settings.as_str()
            || rel.as_str() == ProjectPath::IgnoreFile.as_str())
}
