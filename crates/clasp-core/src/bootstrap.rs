//! Creating and cloning projects
//!
//! Both operations write `.clasp.json` and then fetch the remote content, so
//! a fresh project always has its manifest on disk.

use std::path::Path;

use crate::codec::Codec;
use crate::remote::ScriptService;
use crate::scanner::LocalFile;
use crate::settings::{Project, ProjectSettings, ScriptExtension};
use crate::sync::fetch_project;
use crate::{Error, Result};

/// Settings written into a new project directory
#[derive(Debug, Clone, Default)]
pub struct ProjectLayout {
    pub root_dir: Option<String>,
    pub file_extension: Option<ScriptExtension>,
}

impl ProjectLayout {
    fn settings(&self, script_id: &str) -> ProjectSettings {
        ProjectSettings {
            root_dir: self.root_dir.clone(),
            file_extension: self.file_extension,
            ..ProjectSettings::new(script_id)
        }
    }
}

/// A project that was just written to disk
#[derive(Debug)]
pub struct Bootstrapped {
    pub project: Project,
    pub files: Vec<LocalFile>,
}

/// Create a remote project and set it up in `dir`
///
/// # Errors
///
/// Returns [`Error::ProjectExists`] before any remote call when `dir`
/// already holds settings.
pub async fn create_project(
    script: &dyn ScriptService,
    dir: &Path,
    title: &str,
    parent_id: Option<&str>,
    layout: &ProjectLayout,
) -> Result<Bootstrapped> {
    ensure_vacant(dir)?;

    let remote = script.create_project(title, parent_id).await?;
    tracing::info!(script_id = %remote.script_id, title, "created project");

    attach(script, dir, &remote.script_id, None, layout).await
}

/// Set up an existing remote project in `dir`
///
/// `version` selects the content to fetch; `None` is HEAD.
pub async fn clone_project(
    script: &dyn ScriptService,
    dir: &Path,
    script_id: &str,
    version: Option<u32>,
    layout: &ProjectLayout,
) -> Result<Bootstrapped> {
    ensure_vacant(dir)?;
    attach(script, dir, script_id, version, layout).await
}

fn ensure_vacant(dir: &Path) -> Result<()> {
    let path = Project::settings_path(dir);
    if path.exists() {
        return Err(Error::ProjectExists {
            path: path.to_native(),
        });
    }
    Ok(())
}

async fn attach(
    script: &dyn ScriptService,
    dir: &Path,
    script_id: &str,
    version: Option<u32>,
    layout: &ProjectLayout,
) -> Result<Bootstrapped> {
    let settings = layout.settings(script_id);
    let codec = Codec::new(settings.script_extension());
    let candidate = Project::new(dir, settings.clone());

    // Fetch first so a bad script id leaves no settings file behind
    let files = fetch_project(script, script_id, &candidate.root_dir(), codec, version).await?;
    let project = Project::init(dir, settings)?;

    Ok(Bootstrapped { project, files })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::{DriveService, MemoryServices, ProjectState, RemoteError, SCRIPT_MIME_TYPE};
    use chrono::Utc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_create_writes_settings_and_manifest() {
        let temp = TempDir::new().unwrap();
        let services = MemoryServices::new();

        let created = create_project(
            &services,
            temp.path(),
            "My Script",
            None,
            &ProjectLayout::default(),
        )
        .await
        .unwrap();

        assert!(temp.path().join(".clasp.json").is_file());
        assert!(temp.path().join("appsscript.json").is_file());
        let loaded = Project::load(temp.path()).unwrap();
        assert_eq!(loaded.script_id(), created.project.script_id());
        assert_eq!(
            services.project(created.project.script_id()).unwrap().title,
            "My Script"
        );
    }

    #[tokio::test]
    async fn test_create_refuses_existing_project() {
        let temp = TempDir::new().unwrap();
        Project::init(temp.path(), ProjectSettings::new("old")).unwrap();
        let services = MemoryServices::new();

        let err = create_project(&services, temp.path(), "x", None, &ProjectLayout::default())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ProjectExists { .. }));
        assert!(
            services
                .list_files(SCRIPT_MIME_TYPE, None)
                .await
                .unwrap()
                .files
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_clone_into_root_dir() {
        let temp = TempDir::new().unwrap();
        let services = MemoryServices::new();
        services.insert_project(ProjectState::new("abc", "Existing", None, Utc::now()));
        let layout = ProjectLayout {
            root_dir: Some("src".to_string()),
            file_extension: Some(ScriptExtension::Js),
        };

        let cloned = clone_project(&services, temp.path(), "abc", None, &layout)
            .await
            .unwrap();

        assert_eq!(cloned.files.len(), 1);
        assert!(temp.path().join("src/appsscript.json").is_file());
        let settings = Project::load(temp.path()).unwrap().settings;
        assert_eq!(settings.root_dir.as_deref(), Some("src"));
        assert_eq!(settings.script_extension(), ScriptExtension::Js);
    }

    #[tokio::test]
    async fn test_clone_unknown_script_leaves_no_settings() {
        let temp = TempDir::new().unwrap();
        let services = MemoryServices::new();

        let err = clone_project(&services, temp.path(), "nope", None, &ProjectLayout::default())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Remote(RemoteError::NotFound { .. })));
        assert!(!temp.path().join(".clasp.json").exists());
    }
}
