//! Remote services persisted under a local directory
//!
//! Layout:
//! ```text
//! <dir>/projects/<scriptId>.json   one ProjectState per project
//! <dir>/logs/<projectId>.json      log entries for a cloud project
//! ```
//! Every call loads, mutates and saves one project file, so each remote
//! operation stays a single atomic replace of that file.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use clasp_fs::{ConfigStore, NormalizedPath};
use serde_json::Value;

use super::memory::paginate;
use super::state::{new_script_id, not_found};
use super::{
    Deployment, DriveFile, DriveService, FilePage, LogEntry, LogService, ProjectState,
    RemoteError, RemoteFile, RemoteProject, RemoteResult, ResourceKind, SCRIPT_MIME_TYPE,
    ScriptService, Version,
};

const PAGE_SIZE: usize = 50;

/// Remote services stored as JSON files
#[derive(Debug)]
pub struct LocalServices {
    dir: PathBuf,
    store: ConfigStore,
    // Serializes load-mutate-save within this process
    guard: Mutex<()>,
}

impl LocalServices {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            store: ConfigStore::new(),
            guard: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn project_path(&self, script_id: &str) -> RemoteResult<NormalizedPath> {
        self.entry_path("projects", script_id)
    }

    fn logs_path(&self, project_id: &str) -> RemoteResult<NormalizedPath> {
        self.entry_path("logs", project_id)
    }

    /// `<dir>/<kind>/<id>.json`; ids are single file name components
    fn entry_path(&self, kind: &str, id: &str) -> RemoteResult<NormalizedPath> {
        if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\', ':']) {
            return Err(RemoteError::InvalidArgument {
                message: format!("invalid id `{}`", id),
            });
        }
        Ok(NormalizedPath::new(
            self.dir.join(kind).join(format!("{}.json", id)),
        ))
    }

    fn load(&self, script_id: &str) -> RemoteResult<ProjectState> {
        let path = self.project_path(script_id)?;
        if !path.is_file() {
            return Err(not_found(ResourceKind::Project, script_id));
        }
        self.store.load(&path).map_err(unavailable)
    }

    fn save(&self, state: &ProjectState) -> RemoteResult<()> {
        self.store
            .save(&self.project_path(&state.script_id)?, state)
            .map_err(unavailable)
    }

    /// Store a project as-is, replacing any previous state
    pub fn insert_project(&self, state: &ProjectState) -> RemoteResult<()> {
        let _lock = self.guard.lock().unwrap_or_else(|e| e.into_inner());
        self.save(state)
    }

    fn read<T>(
        &self,
        script_id: &str,
        f: impl FnOnce(&ProjectState) -> RemoteResult<T>,
    ) -> RemoteResult<T> {
        let _lock = self.guard.lock().unwrap_or_else(|e| e.into_inner());
        f(&self.load(script_id)?)
    }

    fn modify<T>(
        &self,
        script_id: &str,
        f: impl FnOnce(&mut ProjectState) -> RemoteResult<T>,
    ) -> RemoteResult<T> {
        let _lock = self.guard.lock().unwrap_or_else(|e| e.into_inner());
        let mut state = self.load(script_id)?;
        let value = f(&mut state)?;
        self.save(&state)?;
        Ok(value)
    }

    fn all_projects(&self) -> RemoteResult<Vec<ProjectState>> {
        let dir = self.dir.join("projects");
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut paths: Vec<PathBuf> = std::fs::read_dir(&dir)
            .map_err(|e| unavailable(clasp_fs::Error::io(&dir, e)))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        paths
            .iter()
            .map(|p| self.store.load(&NormalizedPath::new(p)).map_err(unavailable))
            .collect()
    }
}

fn unavailable(err: clasp_fs::Error) -> RemoteError {
    RemoteError::Unavailable {
        message: err.to_string(),
    }
}

#[async_trait]
impl ScriptService for LocalServices {
    async fn create_project(
        &self,
        title: &str,
        parent_id: Option<&str>,
    ) -> RemoteResult<RemoteProject> {
        let state = ProjectState::new(
            new_script_id(),
            title,
            parent_id.map(str::to_string),
            Utc::now(),
        );
        self.insert_project(&state)?;
        tracing::debug!(script_id = %state.script_id, dir = %self.dir.display(), "stored project");
        Ok(state.summary())
    }

    async fn get_content(
        &self,
        script_id: &str,
        version_number: Option<u32>,
    ) -> RemoteResult<Vec<RemoteFile>> {
        self.read(script_id, |p| p.content(version_number))
    }

    async fn update_content(&self, script_id: &str, files: Vec<RemoteFile>) -> RemoteResult<()> {
        self.modify(script_id, |p| p.replace_content(files))
    }

    async fn create_version(&self, script_id: &str, description: &str) -> RemoteResult<Version> {
        self.modify(script_id, |p| Ok(p.create_version(description, Utc::now())))
    }

    async fn list_versions(&self, script_id: &str) -> RemoteResult<Vec<Version>> {
        self.read(script_id, |p| Ok(p.list_versions()))
    }

    async fn create_deployment(
        &self,
        script_id: &str,
        version_number: u32,
        description: &str,
    ) -> RemoteResult<Deployment> {
        self.modify(script_id, |p| {
            p.create_deployment(version_number, description, Utc::now())
        })
    }

    async fn update_deployment(
        &self,
        script_id: &str,
        deployment_id: &str,
        version_number: u32,
        description: &str,
    ) -> RemoteResult<Deployment> {
        self.modify(script_id, |p| {
            p.update_deployment(deployment_id, version_number, description, Utc::now())
        })
    }

    async fn delete_deployment(&self, script_id: &str, deployment_id: &str) -> RemoteResult<()> {
        self.modify(script_id, |p| p.delete_deployment(deployment_id))
    }

    async fn list_deployments(&self, script_id: &str) -> RemoteResult<Vec<Deployment>> {
        self.read(script_id, |p| Ok(p.deployments.clone()))
    }

    async fn run_function(
        &self,
        script_id: &str,
        function: &str,
        _parameters: Vec<Value>,
        _dev_mode: bool,
    ) -> RemoteResult<Value> {
        self.read(script_id, |p| p.run_function(function))
    }
}

#[async_trait]
impl DriveService for LocalServices {
    async fn list_files(&self, mime_type: &str, page_token: Option<&str>) -> RemoteResult<FilePage> {
        let files: Vec<DriveFile> = if mime_type == SCRIPT_MIME_TYPE {
            let _lock = self.guard.lock().unwrap_or_else(|e| e.into_inner());
            self.all_projects()?
                .into_iter()
                .map(|p| DriveFile {
                    id: p.script_id,
                    name: p.title,
                })
                .collect()
        } else {
            Vec::new()
        };
        Ok(paginate(files, page_token, PAGE_SIZE))
    }
}

#[async_trait]
impl LogService for LocalServices {
    async fn list_entries(
        &self,
        project_id: &str,
        page_size: usize,
    ) -> RemoteResult<Vec<LogEntry>> {
        let path = self.logs_path(project_id)?;
        if !path.is_file() {
            return Ok(Vec::new());
        }
        let mut entries: Vec<LogEntry> = self.store.load(&path).map_err(unavailable)?;
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries.truncate(page_size);
        Ok(entries)
    }
}
