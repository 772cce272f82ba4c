//! In-process remote services

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use super::state::{new_script_id, not_found};
use super::{
    Deployment, DriveFile, DriveService, FilePage, LogEntry, LogService, ProjectState,
    RemoteError, RemoteFile, RemoteProject, RemoteResult, ResourceKind, SCRIPT_MIME_TYPE,
    ScriptService, Version,
};

#[derive(Debug, Default)]
struct Inner {
    projects: BTreeMap<String, ProjectState>,
    logs: BTreeMap<String, Vec<LogEntry>>,
    content_updates: usize,
    update_failure: Option<RemoteError>,
    drive_unusable: bool,
}

/// Remote services backed by process memory
///
/// Besides the service traits it exposes inspection and fault-injection
/// hooks so tests can observe what reached the "remote" side.
#[derive(Debug)]
pub struct MemoryServices {
    inner: Mutex<Inner>,
    page_size: usize,
}

impl Default for MemoryServices {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryServices {
    pub fn new() -> Self {
        Self::with_page_size(100)
    }

    /// Drive listings return at most `page_size` files per page
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            page_size: page_size.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic while holding the lock leaves plain data behind; keep serving it
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn insert_project(&self, project: ProjectState) {
        self.lock()
            .projects
            .insert(project.script_id.clone(), project);
    }

    pub fn project(&self, script_id: &str) -> Option<ProjectState> {
        self.lock().projects.get(script_id).cloned()
    }

    /// Number of successful `update_content` calls so far
    pub fn content_updates(&self) -> usize {
        self.lock().content_updates
    }

    /// Make every following `update_content` call fail with `error`
    pub fn fail_content_updates(&self, error: RemoteError) {
        self.lock().update_failure = Some(error);
    }

    /// Make Drive answer pages without a file list
    pub fn break_drive(&self) {
        self.lock().drive_unusable = true;
    }

    pub fn add_log(&self, project_id: &str, entry: LogEntry) {
        self.lock()
            .logs
            .entry(project_id.to_string())
            .or_default()
            .push(entry);
    }

    pub fn set_function_result(&self, script_id: &str, function: &str, value: Value) {
        if let Some(project) = self.lock().projects.get_mut(script_id) {
            project.functions.insert(function.to_string(), value);
        }
    }

    fn with_project<T>(
        &self,
        script_id: &str,
        f: impl FnOnce(&mut ProjectState) -> RemoteResult<T>,
    ) -> RemoteResult<T> {
        let mut inner = self.lock();
        let project = inner
            .projects
            .get_mut(script_id)
            .ok_or_else(|| not_found(ResourceKind::Project, script_id))?;
        f(project)
    }
}

#[async_trait]
impl ScriptService for MemoryServices {
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
        let summary = state.summary();
        self.insert_project(state);
        Ok(summary)
    }

    async fn get_content(
        &self,
        script_id: &str,
        version_number: Option<u32>,
    ) -> RemoteResult<Vec<RemoteFile>> {
        self.with_project(script_id, |p| p.content(version_number))
    }

    async fn update_content(&self, script_id: &str, files: Vec<RemoteFile>) -> RemoteResult<()> {
        let mut inner = self.lock();
        if let Some(error) = inner.update_failure.clone() {
            return Err(error);
        }
        let project = inner
            .projects
            .get_mut(script_id)
            .ok_or_else(|| not_found(ResourceKind::Project, script_id))?;
        project.replace_content(files)?;
        inner.content_updates += 1;
        Ok(())
    }

    async fn create_version(&self, script_id: &str, description: &str) -> RemoteResult<Version> {
        self.with_project(script_id, |p| Ok(p.create_version(description, Utc::now())))
    }

    async fn list_versions(&self, script_id: &str) -> RemoteResult<Vec<Version>> {
        self.with_project(script_id, |p| Ok(p.list_versions()))
    }

    async fn create_deployment(
        &self,
        script_id: &str,
        version_number: u32,
        description: &str,
    ) -> RemoteResult<Deployment> {
        self.with_project(script_id, |p| {
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
        self.with_project(script_id, |p| {
            p.update_deployment(deployment_id, version_number, description, Utc::now())
        })
    }

    async fn delete_deployment(&self, script_id: &str, deployment_id: &str) -> RemoteResult<()> {
        self.with_project(script_id, |p| p.delete_deployment(deployment_id))
    }

    async fn list_deployments(&self, script_id: &str) -> RemoteResult<Vec<Deployment>> {
        self.with_project(script_id, |p| Ok(p.deployments.clone()))
    }

    async fn run_function(
        &self,
        script_id: &str,
        function: &str,
        _parameters: Vec<Value>,
        _dev_mode: bool,
    ) -> RemoteResult<Value> {
        self.with_project(script_id, |p| p.run_function(function))
    }
}

#[async_trait]
impl DriveService for MemoryServices {
    async fn list_files(&self, mime_type: &str, page_token: Option<&str>) -> RemoteResult<FilePage> {
        let inner = self.lock();
        if inner.drive_unusable {
            return Ok(FilePage::default());
        }
        let all: Vec<DriveFile> = if mime_type == SCRIPT_MIME_TYPE {
            inner
                .projects
                .values()
                .map(|p| DriveFile {
                    id: p.script_id.clone(),
                    name: p.title.clone(),
                })
                .collect()
        } else {
            Vec::new()
        };
        Ok(paginate(all, page_token, self.page_size))
    }
}

#[async_trait]
impl LogService for MemoryServices {
    async fn list_entries(
        &self,
        project_id: &str,
        page_size: usize,
    ) -> RemoteResult<Vec<LogEntry>> {
        let inner = self.lock();
        let mut entries = inner.logs.get(project_id).cloned().unwrap_or_default();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries.truncate(page_size);
        Ok(entries)
    }
}

/// Slice `files` into pages; the token is the offset of the next page
pub(crate) fn paginate(files: Vec<DriveFile>, page_token: Option<&str>, page_size: usize) -> FilePage {
    let start = page_token
        .and_then(|t| t.parse::<usize>().ok())
        .unwrap_or(0)
        .min(files.len());
    let end = (start + page_size).min(files.len());
    let next_page_token = (end < files.len()).then(|| end.to_string());
    FilePage {
        files: Some(files[start..end].to_vec()),
        next_page_token,
    }
}
