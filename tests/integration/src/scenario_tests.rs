//! Scenario tests across clasp-fs, clasp-core and the file-backed remote
//!
//! Each test drives a full workflow the way the CLI would: settings loaded
//! once into a `Project`, then handed to the engine and the lifecycle
//! manager, with the remote persisted under a temporary directory.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use clasp_core::remote::{
    Deployment, LocalServices, ProjectState, ScriptService, Services,
};
use clasp_core::{
    DeploymentManager, Error, Project, ProjectLayout, SyncEngine, create_project,
};
use clasp_test_utils::TestProject;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

// =============================================================================
// Test Infrastructure
// =============================================================================

/// A file-backed remote living in its own temporary directory
struct Remote {
    _dir: TempDir,
    services: Arc<LocalServices>,
}

impl Remote {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let services = Arc::new(LocalServices::new(dir.path()));
        Self {
            _dir: dir,
            services,
        }
    }

    fn script(&self) -> Arc<dyn ScriptService> {
        self.services.clone()
    }

    /// Seed a project whose versions 1..=3 exist and `dep123` serves version 2
    fn seed_with_deployment(&self, script_id: &str) {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut state = ProjectState::new(script_id, "Seeded", None, now);
        for n in 1..=3 {
            state.create_version(&format!("v{}", n), now);
        }
        state.deployments.push(Deployment {
            deployment_id: "dep123".to_string(),
            version_number: Some(2),
            description: "stable".to_string(),
            update_time: now,
        });
        self.services.insert_project(&state).unwrap();
    }
}

// =============================================================================
// Deployment lifecycle
// =============================================================================

#[tokio::test]
async fn test_redeploy_dep123_from_2_to_3() {
    let remote = Remote::new();
    remote.seed_with_deployment("s1");
    let manager = DeploymentManager::new(remote.script(), "s1");

    let updated = manager.redeploy("dep123", 3, "hotfix").await.unwrap();

    assert_eq!(updated.deployment_id, "dep123");
    assert_eq!(updated.version_number, Some(3));
    assert_eq!(updated.description, "hotfix");

    // The change is persisted, not just returned
    let reread = DeploymentManager::new(
        Arc::new(LocalServices::new(remote.services.dir())),
        "s1",
    );
    let listed = reread.list_deployments().await.unwrap();
    let dep = listed.iter().find(|d| d.deployment_id == "dep123").unwrap();
    assert_eq!(dep.version_number, Some(3));
    assert_eq!(listed.len(), 2);
}

#[tokio::test]
async fn test_read_only_undeploy_leaves_list_unchanged() {
    let remote = Remote::new();
    remote.seed_with_deployment("s1");
    let manager = DeploymentManager::new(remote.script(), "s1");
    let before = manager.list_deployments().await.unwrap();
    let head = before.iter().find(|d| d.is_head()).unwrap();

    let err = manager.undeploy(&head.deployment_id).await.unwrap_err();

    assert!(matches!(err, Error::ReadOnlyDeletion { .. }));
    assert_eq!(manager.list_deployments().await.unwrap(), before);
}

#[tokio::test]
async fn test_deploy_ordering_follows_pushes() {
    // Each deploy freezes the content pushed right before it
    let remote = Remote::new();
    let project = TestProject::new();
    let created = create_project(
        remote.services.as_ref(),
        project.root(),
        "Ordered",
        None,
        &ProjectLayout::default(),
    )
    .await
    .unwrap();
    let script_id = created.project.script_id().to_string();
    let engine = SyncEngine::new(&created.project, remote.script());
    let manager = DeploymentManager::new(remote.script(), &script_id);

    project.write("Code.gs", "// one");
    engine.push_files().await.unwrap();
    let first = manager.deploy(None, "one").await.unwrap();
    project.write("Code.gs", "// two");
    engine.push_files().await.unwrap();
    let second = manager.deploy(None, "two").await.unwrap();

    assert!(second.version > first.version);
    let versions = manager.list_versions().await.unwrap();
    assert_eq!(versions[0].version_number, second.version);

    engine.fetch_project(Some(first.version)).await.unwrap();
    assert_eq!(project.read("Code.gs"), "// one");
}

// =============================================================================
// Synchronization
// =============================================================================

#[tokio::test]
async fn test_push_is_idempotent_on_disk() {
    let remote = Remote::new();
    let project = TestProject::new();
    create_project(
        remote.services.as_ref(),
        project.root(),
        "Idempotent",
        None,
        &ProjectLayout::default(),
    )
    .await
    .unwrap();
    project.write("lib/Util.gs", "function util() {}");
    project.write("views/page.html", "<p></p>");
    let loaded = Project::load(project.root()).unwrap();
    let engine = SyncEngine::new(&loaded, remote.script());

    engine.push_files().await.unwrap();
    let first = remote
        .services
        .get_content(loaded.script_id(), None)
        .await
        .unwrap();
    engine.push_files().await.unwrap();
    let second = remote
        .services
        .get_content(loaded.script_id(), None)
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

#[tokio::test]
async fn test_status_scenario_with_ignore_file() {
    let remote = Remote::new();
    let project = TestProject::new()
        .with_settings("s1")
        .with_ignore(&["*.tmp", "!keep.tmp"])
        .with_file("Code.gs", "")
        .with_file("appsscript.json", "{}")
        .with_file("ignored.tmp", "")
        .with_file("keep.tmp", "");
    let engine = SyncEngine::new(&project.project(), remote.script());

    let status = engine.status().unwrap();

    assert_eq!(status.files_to_push, vec!["Code.gs", "appsscript.json"]);
    assert_eq!(status.untracked_files, vec!["ignored.tmp"]);
}

#[tokio::test]
async fn test_services_bundle_shares_one_backend() {
    let remote = Remote::new();
    let services = Services::from_backend(remote.services.clone());
    let project = TestProject::new();

    let created = create_project(
        services.script.as_ref(),
        project.root(),
        "Bundled",
        None,
        &ProjectLayout::default(),
    )
    .await
    .unwrap();
    let listed = clasp_core::catalog::list_script_projects(services.drive.as_ref())
        .await
        .unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, created.project.script_id());
}
