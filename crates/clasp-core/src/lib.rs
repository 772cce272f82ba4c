//! Project synchronization and deployment lifecycle engine for clasp
//!
//! This crate implements everything between the `clasp` command line and the
//! remote script services:
//!
//! - **Ignore matcher**: compiles `.claspignore` patterns
//! - **Scanner**: classifies local files as tracked or untracked
//! - **Codec**: maps local files to remote files and back
//! - **SyncEngine**: status, push and fetch
//! - **DeploymentManager**: versions and deployments
//!
//! # Architecture
//!
//! ```text
//!                     clasp-cli
//!                         |
//!                    clasp-core
//!                    /        \
//!              clasp-fs     remote services (traits)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use clasp_core::{Project, SyncEngine, remote::{LocalServices, Services}};
//!
//! let services = Services::from_backend(Arc::new(LocalServices::new("/tmp/remote")));
//! let project = Project::find(&std::env::current_dir()?)?;
//! let report = SyncEngine::new(&project, services.script.clone()).push_files().await?;
//! println!("pushed {} files", report.count());
//! ```

pub mod bootstrap;
pub mod catalog;
pub mod codec;
pub mod config;
pub mod deploy;
pub mod error;
pub mod ignore;
pub mod remote;
pub mod scanner;
pub mod settings;
pub mod sync;
pub mod watch;

pub use bootstrap::{Bootstrapped, ProjectLayout, clone_project, create_project};
pub use codec::Codec;
pub use config::{ClientConfig, ClientConfigLoader};
pub use deploy::{DeployOutcome, DeploymentManager};
pub use error::{Error, Result};
pub use ignore::{DEFAULT_IGNORE_PATTERNS, IgnoreMatcher};
pub use remote::{
    Deployment, DriveFile, FileType, LogEntry, RemoteError, RemoteFile, Services, Version,
};
pub use scanner::{FileClassification, LocalFile, scan};
pub use settings::{Project, ProjectSettings, ScriptExtension};
pub use sync::{PushReport, SyncEngine, fetch_project};
pub use watch::{PushTrigger, PushWatcher, run_watch};
