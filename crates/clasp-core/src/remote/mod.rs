//! Remote service interfaces
//!
//! The core talks to three services: the Script service (projects, content,
//! versions, deployments, execution), the Drive service (file listing) and
//! the Log service (execution logs). Transport, authentication and retries
//! belong to the implementations; the core calls each operation once.
//!
//! Two transport-free implementations are provided:
//! - [`MemoryServices`]: in-process state, for tests
//! - [`LocalServices`]: state persisted as JSON under a directory

mod local;
mod memory;
mod state;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use local::LocalServices;
pub use memory::MemoryServices;
pub use state::{DEFAULT_MANIFEST_SOURCE, ProjectState};

/// Result type for remote calls
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Drive mime type of script projects
pub const SCRIPT_MIME_TYPE: &str = "application/vnd.google-apps.script";

/// Kind of remote resource named in a not-found error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceKind {
    Project,
    Version,
    Deployment,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Project => "Project",
            Self::Version => "Version",
            Self::Deployment => "Deployment",
        };
        write!(f, "{}", name)
    }
}

/// Errors reported by a remote service
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: ResourceKind, id: String },

    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("Precondition failed: {message}")]
    FailedPrecondition { message: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Script function {function} failed: {message}")]
    ScriptFailed { function: String, message: String },

    #[error("Remote service unavailable: {message}")]
    Unavailable { message: String },
}

/// Remote file type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileType {
    ServerJs,
    Html,
    Json,
}

impl FileType {
    /// The wire tag
    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::ServerJs => "SERVER_JS",
            Self::Html => "HTML",
            Self::Json => "JSON",
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_tag())
    }
}

/// A file as the remote project stores it: no directories, no extension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFile {
    pub name: String,
    #[serde(rename = "type")]
    pub file_type: FileType,
    pub source: String,
}

/// A newly created remote project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteProject {
    pub script_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

/// An immutable snapshot of the project content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    pub version_number: u32,
    #[serde(default)]
    pub description: String,
    pub create_time: DateTime<Utc>,
}

/// A deployment bound to a version, or to HEAD when `version_number` is `None`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub deployment_id: String,
    #[serde(default)]
    pub version_number: Option<u32>,
    #[serde(default)]
    pub description: String,
    pub update_time: DateTime<Utc>,
}

impl Deployment {
    /// Whether this deployment tracks the live HEAD content
    pub fn is_head(&self) -> bool {
        self.version_number.is_none()
    }

    /// `@<n>` or `@HEAD`, the way listings label a deployment
    pub fn version_label(&self) -> String {
        match self.version_number {
            Some(n) => format!("@{}", n),
            None => "@HEAD".to_string(),
        }
    }
}

/// One Drive file entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveFile {
    pub id: String,
    pub name: String,
}

/// One page of a Drive listing
///
/// `files` is `None` when the service answered without a payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilePage {
    pub files: Option<Vec<DriveFile>>,
    pub next_page_token: Option<String>,
}

/// One log line emitted by a script execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub severity: String,
    #[serde(default)]
    pub function_name: Option<String>,
    pub message: String,
}

/// Script service: projects, content, versions, deployments, execution
#[async_trait]
pub trait ScriptService: Send + Sync {
    async fn create_project(
        &self,
        title: &str,
        parent_id: Option<&str>,
    ) -> RemoteResult<RemoteProject>;

    /// Full file list at HEAD (`None`) or at a version
    async fn get_content(
        &self,
        script_id: &str,
        version_number: Option<u32>,
    ) -> RemoteResult<Vec<RemoteFile>>;

    /// Replace the entire file set in one transaction
    async fn update_content(&self, script_id: &str, files: Vec<RemoteFile>) -> RemoteResult<()>;

    async fn create_version(&self, script_id: &str, description: &str) -> RemoteResult<Version>;

    /// Versions oldest first
    async fn list_versions(&self, script_id: &str) -> RemoteResult<Vec<Version>>;

    async fn create_deployment(
        &self,
        script_id: &str,
        version_number: u32,
        description: &str,
    ) -> RemoteResult<Deployment>;

    async fn update_deployment(
        &self,
        script_id: &str,
        deployment_id: &str,
        version_number: u32,
        description: &str,
    ) -> RemoteResult<Deployment>;

    async fn delete_deployment(&self, script_id: &str, deployment_id: &str) -> RemoteResult<()>;

    async fn list_deployments(&self, script_id: &str) -> RemoteResult<Vec<Deployment>>;

    async fn run_function(
        &self,
        script_id: &str,
        function: &str,
        parameters: Vec<serde_json::Value>,
        dev_mode: bool,
    ) -> RemoteResult<serde_json::Value>;
}

/// Drive service: paged file listing filtered by mime type
#[async_trait]
pub trait DriveService: Send + Sync {
    async fn list_files(&self, mime_type: &str, page_token: Option<&str>) -> RemoteResult<FilePage>;
}

/// Log service: entries for a cloud project, newest first
#[async_trait]
pub trait LogService: Send + Sync {
    async fn list_entries(&self, project_id: &str, page_size: usize)
    -> RemoteResult<Vec<LogEntry>>;
}

/// Authenticated handles to the three remote services
#[derive(Clone)]
pub struct Services {
    pub script: Arc<dyn ScriptService>,
    pub drive: Arc<dyn DriveService>,
    pub logs: Arc<dyn LogService>,
}

impl Services {
    /// Use one value for all three services
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: ScriptService + DriveService + LogService + 'static,
    {
        Self {
            script: backend.clone(),
            drive: backend.clone(),
            logs: backend,
        }
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}
