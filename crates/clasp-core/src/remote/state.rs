//! Remote project model shared by the transport-free service implementations
//!
//! Mirrors the contract the core relies on: the file set is replaced as a
//! whole, versions are append-only snapshots, a deployment can only bind an
//! existing version, and the HEAD deployment is read-only.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use clasp_fs::constants::MANIFEST_NAME;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    Deployment, FileType, RemoteError, RemoteFile, RemoteProject, RemoteResult, ResourceKind,
    Version,
};

/// Manifest a freshly created project starts with
pub const DEFAULT_MANIFEST_SOURCE: &str = r#"{
  "timeZone": "America/New_York",
  "dependencies": {},
  "exceptionLogging": "STACKDRIVER",
  "runtimeVersion": "V8"
}
"#;

/// A version together with the file set it froze
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    #[serde(flatten)]
    pub version: Version,
    pub files: Vec<RemoteFile>,
}

/// Complete state of one remote project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectState {
    pub script_id: String,
    pub title: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    pub files: Vec<RemoteFile>,
    #[serde(default)]
    pub versions: Vec<VersionRecord>,
    #[serde(default)]
    pub deployments: Vec<Deployment>,
    /// Canned return values for `run_function`, keyed by function name
    #[serde(default)]
    pub functions: BTreeMap<String, Value>,
}

impl ProjectState {
    /// A new project holding only the default manifest and a HEAD deployment
    pub fn new(
        script_id: impl Into<String>,
        title: impl Into<String>,
        parent_id: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            script_id: script_id.into(),
            title: title.into(),
            parent_id,
            files: vec![RemoteFile {
                name: MANIFEST_NAME.to_string(),
                file_type: FileType::Json,
                source: DEFAULT_MANIFEST_SOURCE.to_string(),
            }],
            versions: Vec::new(),
            deployments: vec![Deployment {
                deployment_id: new_deployment_id(),
                version_number: None,
                description: "Head deployment".to_string(),
                update_time: now,
            }],
            functions: BTreeMap::new(),
        }
    }

    pub fn summary(&self) -> RemoteProject {
        RemoteProject {
            script_id: self.script_id.clone(),
            title: self.title.clone(),
            parent_id: self.parent_id.clone(),
        }
    }

    pub fn content(&self, version_number: Option<u32>) -> RemoteResult<Vec<RemoteFile>> {
        match version_number {
            None => Ok(self.files.clone()),
            Some(n) => self
                .versions
                .iter()
                .find(|record| record.version.version_number == n)
                .map(|record| record.files.clone())
                .ok_or_else(|| not_found(ResourceKind::Version, n)),
        }
    }

    /// Replace the whole file set; rejected unless it carries one manifest
    pub fn replace_content(&mut self, files: Vec<RemoteFile>) -> RemoteResult<()> {
        let manifests = files
            .iter()
            .filter(|f| f.file_type == FileType::Json && f.name == MANIFEST_NAME)
            .count();
        if manifests != 1 {
            return Err(RemoteError::InvalidArgument {
                message: format!(
                    "Project content must contain exactly one {} manifest, found {}",
                    MANIFEST_NAME, manifests
                ),
            });
        }

        let mut seen = std::collections::HashSet::new();
        for file in &files {
            if !seen.insert((file.name.as_str(), file.file_type)) {
                return Err(RemoteError::InvalidArgument {
                    message: format!("Duplicate file {} ({})", file.name, file.file_type),
                });
            }
        }

        self.files = files;
        Ok(())
    }

    pub fn create_version(&mut self, description: &str, now: DateTime<Utc>) -> Version {
        let next = self
            .versions
            .last()
            .map(|record| record.version.version_number + 1)
            .unwrap_or(1);
        let version = Version {
            version_number: next,
            description: description.to_string(),
            create_time: now,
        };
        self.versions.push(VersionRecord {
            version: version.clone(),
            files: self.files.clone(),
        });
        version
    }

    pub fn list_versions(&self) -> Vec<Version> {
        self.versions.iter().map(|r| r.version.clone()).collect()
    }

    pub fn create_deployment(
        &mut self,
        version_number: u32,
        description: &str,
        now: DateTime<Utc>,
    ) -> RemoteResult<Deployment> {
        self.require_version(version_number)?;
        let deployment = Deployment {
            deployment_id: new_deployment_id(),
            version_number: Some(version_number),
            description: description.to_string(),
            update_time: now,
        };
        self.deployments.push(deployment.clone());
        Ok(deployment)
    }

    pub fn update_deployment(
        &mut self,
        deployment_id: &str,
        version_number: u32,
        description: &str,
        now: DateTime<Utc>,
    ) -> RemoteResult<Deployment> {
        self.require_version(version_number)?;
        let deployment = self
            .deployments
            .iter_mut()
            .find(|d| d.deployment_id == deployment_id)
            .ok_or_else(|| not_found(ResourceKind::Deployment, deployment_id))?;
        if deployment.is_head() {
            return Err(read_only());
        }

        deployment.version_number = Some(version_number);
        deployment.description = description.to_string();
        deployment.update_time = now;
        Ok(deployment.clone())
    }

    pub fn delete_deployment(&mut self, deployment_id: &str) -> RemoteResult<()> {
        let idx = self
            .deployments
            .iter()
            .position(|d| d.deployment_id == deployment_id)
            .ok_or_else(|| not_found(ResourceKind::Deployment, deployment_id))?;
        if self.deployments[idx].is_head() {
            return Err(read_only());
        }
        self.deployments.remove(idx);
        Ok(())
    }

    pub fn run_function(&self, function: &str) -> RemoteResult<Value> {
        self.functions
            .get(function)
            .cloned()
            .ok_or_else(|| RemoteError::ScriptFailed {
                function: function.to_string(),
                message: format!("Script function not found: {}", function),
            })
    }

    fn require_version(&self, version_number: u32) -> RemoteResult<()> {
        if self
            .versions
            .iter()
            .any(|r| r.version.version_number == version_number)
        {
            Ok(())
        } else {
            Err(not_found(ResourceKind::Version, version_number))
        }
    }
}

pub(crate) fn not_found(kind: ResourceKind, id: impl ToString) -> RemoteError {
    RemoteError::NotFound {
        kind,
        id: id.to_string(),
    }
}

fn read_only() -> RemoteError {
    RemoteError::FailedPrecondition {
        message: "Read-only deployments may not be modified.".to_string(),
    }
}

fn new_deployment_id() -> String {
    format!("AKfyc{}", uuid::Uuid::new_v4().simple())
}

pub(crate) fn new_script_id() -> String {
    format!("1{}", uuid::Uuid::new_v4().simple())
}
