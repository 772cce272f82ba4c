//! Remote to local

use std::path::Path;

use clasp_fs::io;

use crate::codec::{Codec, manifest_count};
use crate::remote::ScriptService;
use crate::scanner::LocalFile;
use crate::{Error, Result};

/// Download the remote file set and write it under `root`
///
/// Fetches HEAD when `version` is `None`. The remote set must hold exactly
/// one manifest and every file must decode before anything is written; after
/// that, existing local files with the same path are overwritten.
///
/// # Errors
///
/// - [`Error::Remote`] when the content cannot be fetched
/// - [`Error::MissingManifest`] / [`Error::DuplicateManifest`]
/// - [`Error::UnsupportedFileType`] for a file the codec cannot map
/// - [`Error::InvalidRemoteName`] for a name that resolves outside `root`
pub async fn fetch_project(
    script: &dyn ScriptService,
    script_id: &str,
    root: &Path,
    codec: Codec,
    version: Option<u32>,
) -> Result<Vec<LocalFile>> {
    let remote = script.get_content(script_id, version).await?;

    match manifest_count(&remote) {
        0 => return Err(Error::MissingManifest),
        1 => {}
        count => return Err(Error::DuplicateManifest { count }),
    }

    let files = remote
        .iter()
        .map(|file| codec.decode(file))
        .collect::<Result<Vec<_>>>()?;

    io::ensure_dir(root)?;
    for file in &files {
        tracing::debug!(path = %file.relative_path, "writing");
        codec.write(file, root)?;
    }

    tracing::info!(
        script_id,
        version = ?version,
        files = files.len(),
        "fetched project"
    );
    Ok(files)
}
