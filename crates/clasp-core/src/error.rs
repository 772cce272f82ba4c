//! Error types for clasp-core

use std::path::PathBuf;

use crate::remote::RemoteError;

/// Result type for clasp-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in clasp-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Preconditions: reported before any remote call is attempted
    /// No `.clasp.json` in the directory or any parent
    #[error("No clasp project found at {path} or any parent directory")]
    SettingsNotFound { path: PathBuf },

    /// Settings file exists but carries no script id
    #[error("Project settings at {path} have no scriptId")]
    MissingScriptId { path: PathBuf },

    /// Create/clone into a directory that already holds a project
    #[error("Project settings already exist at {path}")]
    ProjectExists { path: PathBuf },

    /// Log listing needs a cloud project id
    #[error("No projectId in project settings; run `clasp logs --setup` first")]
    MissingProjectId,

    /// No remote directory configured and no platform data directory
    #[error("Cannot determine the remote directory; pass --remote-dir or set CLASP_REMOTE_DIR")]
    NoRemoteDir,

    /// Unknown settings key or invalid value
    #[error("Invalid setting {key}: {message}")]
    InvalidSetting { key: String, message: String },

    // Scan errors
    /// Root directory missing or unreadable
    #[error("Cannot scan {path}: {message}")]
    Scan { path: PathBuf, message: String },

    /// Ignore pattern failed to compile
    #[error("Invalid ignore pattern `{pattern}`: {message}")]
    IgnorePattern { pattern: String, message: String },

    // Codec errors
    /// Extension or remote type tag with no mapping
    #[error("Unsupported file type for {name}: {file_type}")]
    UnsupportedFileType { name: String, file_type: String },

    /// Local file content is not valid UTF-8
    #[error("File {path} is not valid UTF-8 and cannot be pushed")]
    NonUtf8Source { path: String },

    /// Two local files map to the same remote name
    #[error("{first} and {second} would both be pushed as {name}")]
    NameCollision {
        name: String,
        first: String,
        second: String,
    },

    /// Remote file name would resolve outside the root directory
    #[error("Remote file name `{name}` is not a relative path inside the project")]
    InvalidRemoteName { name: String },

    /// Remote file set has no manifest
    #[error("Remote project has no appsscript manifest")]
    MissingManifest,

    /// Remote file set has more than one manifest
    #[error("Remote project has {count} appsscript manifests")]
    DuplicateManifest { count: usize },

    // Remote errors mapped to lifecycle semantics
    /// Deployment references a version that does not exist
    #[error("Version {version} does not exist")]
    VersionNotFound { version: u32 },

    /// Redeploy/undeploy of an unknown deployment
    #[error("Deployment {deployment_id} does not exist")]
    DeploymentNotFound { deployment_id: String },

    /// Remote refused to delete the deployment
    #[error("Deployment {deployment_id} is read-only: {message}")]
    ReadOnlyDeletion {
        deployment_id: String,
        message: String,
    },

    /// A remote listing came back without its payload
    #[error("{service} service returned no data")]
    ServiceUnusable { service: String },

    /// Remote error surfaced verbatim
    #[error(transparent)]
    Remote(#[from] RemoteError),

    // Transparent wrappers for underlying errors
    /// Filesystem error from clasp-fs
    #[error(transparent)]
    Fs(#[from] clasp_fs::Error),

    /// Filesystem watcher error
    #[error(transparent)]
    Watch(#[from] notify::Error),
}
