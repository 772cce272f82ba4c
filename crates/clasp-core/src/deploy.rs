//! Version and deployment lifecycle
//!
//! Versions are immutable and append-only; a deployment points at one
//! version (or at HEAD) and can be repointed without changing its id.
//! Nothing here deletes a version.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::remote::{Deployment, RemoteError, ResourceKind, ScriptService, Version};
use crate::{Error, Result};

/// Result of [`DeploymentManager::deploy`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployOutcome {
    pub version: u32,
    pub deployment: Deployment,
    /// Set when the version was minted as part of this deploy
    pub created_version: Option<Version>,
}

/// Lifecycle operations for one script project
pub struct DeploymentManager {
    script: Arc<dyn ScriptService>,
    script_id: String,
}

impl DeploymentManager {
    pub fn new(script: Arc<dyn ScriptService>, script_id: impl Into<String>) -> Self {
        Self {
            script,
            script_id: script_id.into(),
        }
    }

    pub fn script_id(&self) -> &str {
        &self.script_id
    }

    /// Snapshot the current HEAD content as the next version
    pub async fn create_version(&self, description: &str) -> Result<Version> {
        let version = self
            .script
            .create_version(&self.script_id, description)
            .await?;
        tracing::info!(
            script_id = %self.script_id,
            version = version.version_number,
            "created version"
        );
        Ok(version)
    }

    /// All versions, newest first
    pub async fn list_versions(&self) -> Result<Vec<Version>> {
        let mut versions = self.script.list_versions(&self.script_id).await?;
        versions.reverse();
        Ok(versions)
    }

    /// Create a deployment bound to `version`, minting a version when `None`
    ///
    /// # Errors
    ///
    /// Returns [`Error::VersionNotFound`] when `version` does not exist.
    pub async fn deploy(&self, version: Option<u32>, description: &str) -> Result<DeployOutcome> {
        let (number, created_version) = match version {
            Some(n) => (n, None),
            None => {
                let created = self.create_version(description).await?;
                (created.version_number, Some(created))
            }
        };

        let deployment = self
            .script
            .create_deployment(&self.script_id, number, description)
            .await
            .map_err(|e| self.map_lookup(e, None))?;

        tracing::info!(
            deployment_id = %deployment.deployment_id,
            version = number,
            "created deployment"
        );
        Ok(DeployOutcome {
            version: number,
            deployment,
            created_version,
        })
    }

    /// Point an existing deployment at another version; the id is kept
    ///
    /// # Errors
    ///
    /// - [`Error::DeploymentNotFound`] for an unknown deployment
    /// - [`Error::VersionNotFound`] for an unknown version
    pub async fn redeploy(
        &self,
        deployment_id: &str,
        version: u32,
        description: &str,
    ) -> Result<Deployment> {
        let deployment = self
            .script
            .update_deployment(&self.script_id, deployment_id, version, description)
            .await
            .map_err(|e| self.map_lookup(e, Some(deployment_id)))?;

        tracing::info!(deployment_id, version, "updated deployment");
        Ok(deployment)
    }

    /// Delete one deployment
    ///
    /// # Errors
    ///
    /// - [`Error::DeploymentNotFound`] for an unknown deployment
    /// - [`Error::ReadOnlyDeletion`] when the remote refuses, e.g. for HEAD
    pub async fn undeploy(&self, deployment_id: &str) -> Result<()> {
        self.script
            .delete_deployment(&self.script_id, deployment_id)
            .await
            .map_err(|e| match e {
                RemoteError::FailedPrecondition { message }
                | RemoteError::PermissionDenied { message } => Error::ReadOnlyDeletion {
                    deployment_id: deployment_id.to_string(),
                    message,
                },
                other => self.map_lookup(other, Some(deployment_id)),
            })?;

        tracing::info!(deployment_id, "deleted deployment");
        Ok(())
    }

    /// Delete every versioned deployment, leaving HEAD in place
    ///
    /// Returns the ids that were removed, in listing order.
    pub async fn undeploy_all(&self) -> Result<Vec<String>> {
        let mut removed = Vec::new();
        for deployment in self.list_deployments().await? {
            if deployment.is_head() {
                tracing::debug!(deployment_id = %deployment.deployment_id, "skipping HEAD");
                continue;
            }
            self.undeploy(&deployment.deployment_id).await?;
            removed.push(deployment.deployment_id);
        }
        Ok(removed)
    }

    /// Deployments in the order the remote lists them
    pub async fn list_deployments(&self) -> Result<Vec<Deployment>> {
        Ok(self.script.list_deployments(&self.script_id).await?)
    }

    fn map_lookup(&self, err: RemoteError, deployment_id: Option<&str>) -> Error {
        match err {
            RemoteError::NotFound {
                kind: ResourceKind::Version,
                id,
            } => match id.parse() {
                Ok(version) => Error::VersionNotFound { version },
                Err(_) => Error::Remote(RemoteError::NotFound {
                    kind: ResourceKind::Version,
                    id,
                }),
            },
            RemoteError::NotFound {
                kind: ResourceKind::Deployment,
                id,
            } => Error::DeploymentNotFound {
                deployment_id: deployment_id.map(str::to_string).unwrap_or(id),
            },
            other => Error::Remote(other),
        }
    }
}

impl std::fmt::Debug for DeploymentManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeploymentManager")
            .field("script_id", &self.script_id)
            .finish_non_exhaustive()
    }
}
