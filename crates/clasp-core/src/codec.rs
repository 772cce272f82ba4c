//! Mapping between local files and remote files
//!
//! | local                  | remote type | remote name |
//! |------------------------|-------------|-------------|
//! | `lib/util.gs`, `.js`   | SERVER_JS   | `lib/util`  |
//! | `views/index.html`     | HTML        | `views/index` |
//! | `appsscript.json`      | JSON        | `appsscript` |
//!
//! SERVER_JS files come back with the project's configured script extension.

use std::path::Path;

use clasp_fs::constants::MANIFEST_NAME;
use clasp_fs::{NormalizedPath, ProjectPath, io};

use crate::ignore::is_manifest;
use crate::remote::{FileType, RemoteFile};
use crate::scanner::LocalFile;
use crate::settings::ScriptExtension;
use crate::{Error, Result};

/// Converts files in both directions for one project
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Codec {
    script_extension: ScriptExtension,
}

impl Codec {
    pub fn new(script_extension: ScriptExtension) -> Self {
        Self { script_extension }
    }

    pub fn script_extension(&self) -> ScriptExtension {
        self.script_extension
    }

    /// Local extension to remote type
    pub fn file_type_for(relative_path: &NormalizedPath) -> Result<FileType> {
        match relative_path.extension() {
            Some("gs" | "js") => Ok(FileType::ServerJs),
            Some("html") => Ok(FileType::Html),
            Some("json") if is_manifest(relative_path) => Ok(FileType::Json),
            other => Err(Error::UnsupportedFileType {
                name: relative_path.to_string(),
                file_type: other.map(|e| format!(".{}", e)).unwrap_or_default(),
            }),
        }
    }

    pub fn encode(&self, file: &LocalFile) -> Result<RemoteFile> {
        let file_type = Self::file_type_for(&file.relative_path)?;
        let source =
            String::from_utf8(file.content.clone()).map_err(|_| Error::NonUtf8Source {
                path: file.relative_path.to_string(),
            })?;

        Ok(RemoteFile {
            name: file.relative_path.without_extension().to_string(),
            file_type,
            source,
        })
    }

    /// Encode a whole push set, rejecting two files with one remote name
    pub fn encode_all(&self, files: &[LocalFile]) -> Result<Vec<RemoteFile>> {
        let mut encoded: Vec<RemoteFile> = Vec::with_capacity(files.len());
        for (idx, file) in files.iter().enumerate() {
            let remote = self.encode(file)?;
            if let Some(prev) = encoded
                .iter()
                .position(|r| r.name == remote.name && r.file_type == remote.file_type)
            {
                return Err(Error::NameCollision {
                    name: remote.name,
                    first: files[prev].relative_path.to_string(),
                    second: files[idx].relative_path.to_string(),
                });
            }
            encoded.push(remote);
        }
        Ok(encoded)
    }

    /// Remote file to local path and bytes
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRemoteName`] when the name is empty, absolute
    /// or climbs out with `..`, so nothing can land outside the root.
    pub fn decode(&self, file: &RemoteFile) -> Result<LocalFile> {
        check_remote_name(&file.name)?;
        let extension = match file.file_type {
            FileType::ServerJs => self.script_extension.as_str(),
            FileType::Html => "html",
            FileType::Json if file.name == MANIFEST_NAME => "json",
            FileType::Json => {
                return Err(Error::UnsupportedFileType {
                    name: file.name.clone(),
                    file_type: file.file_type.to_string(),
                });
            }
        };

        Ok(LocalFile::new(
            format!("{}.{}", file.name, extension),
            file.source.clone().into_bytes(),
        ))
    }

    /// Write a decoded file under `root`, creating directories as needed
    pub fn write(&self, file: &LocalFile, root: &Path) -> Result<()> {
        let target = NormalizedPath::new(root.join(file.relative_path.to_native()));
        io::write_atomic(&target, &file.content)?;
        Ok(())
    }
}

fn check_remote_name(name: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name.starts_with(['/', '\\'])
        || name.contains(':')
        || name
            .split(['/', '\\'])
            .any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if invalid {
        return Err(Error::InvalidRemoteName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Count of remote files that are the manifest
pub fn manifest_count(files: &[RemoteFile]) -> usize {
    files
        .iter()
        .filter(|f| f.file_type == FileType::Json && f.name == MANIFEST_NAME)
        .count()
}

/// Local relative path of the manifest
pub fn manifest_path() -> NormalizedPath {
    NormalizedPath::new(ProjectPath::Manifest.as_str())
}
