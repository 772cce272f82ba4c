//! Per-invocation context
//!
//! Resolves the working directory, the client config and the remote
//! services once, then hands them to the command being run.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clasp_core::remote::{LocalServices, Services};
use clasp_core::{ClientConfig, ClientConfigLoader, Project};

use crate::error::Result;

pub struct Context {
    cwd: PathBuf,
    pub config: ClientConfig,
    pub services: Services,
}

impl Context {
    /// Build the context the binary runs with
    pub fn load(cwd: PathBuf, remote_dir: Option<&Path>) -> Result<Self> {
        let config = ClientConfigLoader::new().load()?;
        let dir = config.resolve_remote_dir(remote_dir)?;
        tracing::debug!(remote_dir = %dir.display(), "using local remote");
        let services = Services::from_backend(Arc::new(LocalServices::new(dir)));
        Ok(Self {
            cwd,
            config,
            services,
        })
    }

    #[cfg(test)]
    pub fn with_services(cwd: impl Into<PathBuf>, services: Services) -> Self {
        Self {
            cwd: cwd.into(),
            config: ClientConfig::default(),
            services,
        }
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// The project containing the working directory
    pub fn project(&self) -> Result<Project> {
        Ok(Project::find(&self.cwd)?)
    }
}
