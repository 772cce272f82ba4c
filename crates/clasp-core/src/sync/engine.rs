//! SyncEngine implementation
//!
//! The SyncEngine moves file sets between the project's root directory and
//! the remote project. The remote always receives the complete tracked set;
//! there is no client-side diffing.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::codec::{Codec, manifest_path};
use crate::ignore::IgnoreMatcher;
use crate::remote::{RemoteFile, ScriptService};
use crate::scanner::{self, FileClassification, LocalFile};
use crate::settings::Project;

use super::fetch::fetch_project;
use super::order::order_for_push;

/// Result of a push
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushReport {
    /// Local relative paths, in the order they were transmitted
    pub pushed: Vec<String>,
}

impl PushReport {
    pub fn count(&self) -> usize {
        self.pushed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pushed.is_empty()
    }
}

/// Engine for synchronizing one project
///
/// Built from a loaded [`Project`]; the settings it needs are copied in so
/// the engine can be moved into a watch task.
pub struct SyncEngine {
    script_id: String,
    project_dir: PathBuf,
    root: PathBuf,
    push_order: Vec<String>,
    codec: Codec,
    script: Arc<dyn ScriptService>,
}

impl SyncEngine {
    pub fn new(project: &Project, script: Arc<dyn ScriptService>) -> Self {
        Self {
            script_id: project.script_id().to_string(),
            project_dir: project.dir().to_path_buf(),
            root: project.root_dir(),
            push_order: project.settings.file_push_order.clone(),
            codec: Codec::new(project.settings.script_extension()),
            script,
        }
    }

    pub fn script_id(&self) -> &str {
        &self.script_id
    }

    /// Directory whose files are synchronized
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn codec(&self) -> Codec {
        self.codec
    }

    /// Compile the project's ignore rules
    pub fn matcher(&self) -> Result<IgnoreMatcher> {
        IgnoreMatcher::load(&self.project_dir, &self.root)
    }

    /// Classify local files; never contacts the remote
    pub fn status(&self) -> Result<FileClassification> {
        scanner::scan(&self.root, &self.matcher()?)
    }

    /// Replace the remote file set with the tracked local files
    ///
    /// A missing local manifest is restored with an implicit fetch first.
    /// Every file is encoded before the single remote call, so a codec error
    /// leaves the remote untouched.
    ///
    /// # Errors
    ///
    /// Returns scan and codec errors, or the remote error verbatim.
    pub async fn push_files(&self) -> Result<PushReport> {
        if !manifest_path_in(&self.root).is_file() {
            tracing::warn!(
                root = %self.root.display(),
                "manifest missing locally, fetching remote project first"
            );
            self.fetch_project(None).await?;
        }

        let classification = self.status()?;
        let ordered = order_for_push(&classification.files_to_push, &self.push_order);
        let files = scanner::read_files(&self.root, &ordered)?;
        let remote = self.codec.encode_all(&files)?;

        self.submit(&files, remote).await
    }

    /// Overwrite local files with the remote file set
    ///
    /// `None` fetches HEAD, `Some(n)` the content frozen in version `n`.
    pub async fn fetch_project(&self, version: Option<u32>) -> Result<Vec<LocalFile>> {
        fetch_project(
            self.script.as_ref(),
            &self.script_id,
            &self.root,
            self.codec,
            version,
        )
        .await
    }

    pub(crate) async fn submit(
        &self,
        files: &[LocalFile],
        remote: Vec<RemoteFile>,
    ) -> Result<PushReport> {
        if remote.is_empty() {
            tracing::debug!("nothing to push");
            return Ok(PushReport::default());
        }

        self.script.update_content(&self.script_id, remote).await?;

        let pushed: Vec<String> = files.iter().map(|f| f.relative_path.to_string()).collect();
        tracing::info!(script_id = %self.script_id, files = pushed.len(), "pushed project");
        Ok(PushReport { pushed })
    }
}

impl std::fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("script_id", &self.script_id)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

fn manifest_path_in(root: &Path) -> PathBuf {
    root.join(manifest_path().to_native())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::remote::{FileType, MemoryServices, ProjectState, RemoteError};
    use crate::settings::ProjectSettings;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn setup(settings: ProjectSettings) -> (TempDir, Project, Arc<MemoryServices>) {
        let temp = TempDir::new().unwrap();
        let services = Arc::new(MemoryServices::new());
        services.insert_project(ProjectState::new(
            settings.script_id.clone(),
            "Test",
            None,
            Utc::now(),
        ));
        let project = Project::init(temp.path(), settings).unwrap();
        (temp, project, services)
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[tokio::test]
    async fn test_push_sends_whole_set_in_order() {
        let mut settings = ProjectSettings::new("s1");
        settings.file_push_order = vec!["lib/z.gs".to_string()];
        let (temp, project, services) = setup(settings);
        write(temp.path(), "appsscript.json", "{}");
        write(temp.path(), "Code.gs", "function a() {}");
        write(temp.path(), "lib/z.gs", "var z;");

        let engine = SyncEngine::new(&project, services.clone());
        let report = engine.push_files().await.unwrap();

        assert_eq!(report.pushed, vec!["lib/z.gs", "Code.gs", "appsscript.json"]);
        let remote = services.project("s1").unwrap().files;
        let names: Vec<&str> = remote.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["lib/z", "Code", "appsscript"]);
        assert_eq!(services.content_updates(), 1);
    }

    #[tokio::test]
    async fn test_push_restores_missing_manifest() {
        let (temp, project, services) = setup(ProjectSettings::new("s1"));
        write(temp.path(), "Code.gs", "");

        let engine = SyncEngine::new(&project, services.clone());
        let report = engine.push_files().await.unwrap();

        assert!(temp.path().join("appsscript.json").is_file());
        assert!(report.pushed.contains(&"appsscript.json".to_string()));
        assert!(report.pushed.contains(&"Code.gs".to_string()));
    }

    #[tokio::test]
    async fn test_codec_failure_leaves_remote_untouched() {
        let (temp, project, services) = setup(ProjectSettings::new("s1"));
        write(temp.path(), "appsscript.json", "{}");
        write(temp.path(), "Code.gs", "");
        write(temp.path(), "Code.js", "");

        let engine = SyncEngine::new(&project, services.clone());
        let err = engine.push_files().await.unwrap_err();

        assert!(matches!(err, Error::NameCollision { .. }));
        assert_eq!(services.content_updates(), 0);
    }

    #[tokio::test]
    async fn test_remote_rejection_is_verbatim() {
        let (temp, project, services) = setup(ProjectSettings::new("s1"));
        write(temp.path(), "appsscript.json", "{}");
        let rejection = RemoteError::PermissionDenied {
            message: "no write access".to_string(),
        };
        services.fail_content_updates(rejection.clone());

        let engine = SyncEngine::new(&project, services.clone());
        match engine.push_files().await {
            Err(Error::Remote(err)) => assert_eq!(err, rejection),
            other => panic!("expected remote error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_submit_empty_set_is_noop() {
        let (_temp, project, services) = setup(ProjectSettings::new("s1"));
        let engine = SyncEngine::new(&project, services.clone());

        let report = engine.submit(&[], Vec::new()).await.unwrap();

        assert!(report.is_empty());
        assert_eq!(services.content_updates(), 0);
    }

    #[tokio::test]
    async fn test_fetch_writes_under_root_dir() {
        let (temp, project, services) =
            setup(ProjectSettings::new("s1").with_root_dir("src"));
        let mut state = services.project("s1").unwrap();
        state.files.push(RemoteFile {
            name: "lib/Util".to_string(),
            file_type: FileType::ServerJs,
            source: "var u;".to_string(),
        });
        services.insert_project(state);

        let engine = SyncEngine::new(&project, services.clone());
        let files = engine.fetch_project(None).await.unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(
            fs::read_to_string(temp.path().join("src/lib/Util.gs")).unwrap(),
            "var u;"
        );
        assert!(temp.path().join("src/appsscript.json").is_file());
    }

    #[tokio::test]
    async fn test_fetch_refuses_names_outside_root_dir() {
        let (temp, project, services) =
            setup(ProjectSettings::new("s1").with_root_dir("src"));
        let mut state = services.project("s1").unwrap();
        for name in ["lib/Util", "../escaped"] {
            state.files.push(RemoteFile {
                name: name.to_string(),
                file_type: FileType::ServerJs,
                source: String::new(),
            });
        }
        services.insert_project(state);

        let engine = SyncEngine::new(&project, services.clone());
        let err = engine.fetch_project(None).await.unwrap_err();

        assert!(matches!(err, Error::InvalidRemoteName { ref name } if name == "../escaped"));
        assert!(!temp.path().join("escaped.gs").exists());
        assert!(!temp.path().join("src").exists());
    }

    #[tokio::test]
    async fn test_fetch_overwrites_local_edits() {
        let (temp, project, services) = setup(ProjectSettings::new("s1"));
        write(temp.path(), "appsscript.json", "local edit");

        let engine = SyncEngine::new(&project, services.clone());
        engine.fetch_project(None).await.unwrap();

        let content = fs::read_to_string(temp.path().join("appsscript.json")).unwrap();
        assert!(content.contains("timeZone"));
    }

    #[tokio::test]
    async fn test_fetch_rejects_duplicate_manifest() {
        let (temp, project, services) = setup(ProjectSettings::new("s1"));
        let mut state = services.project("s1").unwrap();
        let manifest = state.files[0].clone();
        state.files.push(manifest);
        services.insert_project(state);

        let engine = SyncEngine::new(&project, services.clone());
        let err = engine.fetch_project(None).await.unwrap_err();

        assert!(matches!(err, Error::DuplicateManifest { count: 2 }));
        assert!(!temp.path().join("appsscript.json").exists());
    }

    #[tokio::test]
    async fn test_fetch_unknown_version() {
        let (_temp, project, services) = setup(ProjectSettings::new("s1"));
        let engine = SyncEngine::new(&project, services.clone());

        let err = engine.fetch_project(Some(9)).await.unwrap_err();
        assert!(matches!(err, Error::Remote(RemoteError::NotFound { .. })));
    }
}
