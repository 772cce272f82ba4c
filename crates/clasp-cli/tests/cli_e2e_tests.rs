//! CLI end-to-end tests that invoke the compiled `clasp` binary.
//!
//! Every test gets its own project directory and its own remote directory,
//! passed with `--remote-dir`, so nothing touches the user's real state.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct Sandbox {
    work: TempDir,
    remote: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            work: TempDir::new().unwrap(),
            remote: TempDir::new().unwrap(),
        }
    }

    fn dir(&self) -> &Path {
        self.work.path()
    }

    /// A `clasp` command running in the project directory
    fn clasp(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("clasp"));
        cmd.current_dir(self.work.path())
            .env("CLASP_REMOTE_DIR", self.remote.path())
            .env("XDG_CONFIG_HOME", self.remote.path().join("config"))
            .env("NO_COLOR", "1")
            .env("CLICOLOR", "0")
            .env_remove("RUST_LOG");
        cmd
    }

    fn script_id(&self) -> String {
        let settings = fs::read_to_string(self.dir().join(".clasp.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&settings).unwrap();
        value["scriptId"].as_str().unwrap().to_string()
    }
}

// ============================================================================
// Help and usage
// ============================================================================

#[test]
fn test_help_lists_commands() {
    Command::new(assert_cmd::cargo::cargo_bin!("clasp"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("push"))
        .stdout(predicate::str::contains("deploy"));
}

#[test]
fn test_status_outside_project_fails() {
    let sandbox = Sandbox::new();
    sandbox
        .clasp()
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"))
        .stderr(predicate::str::contains("No clasp project found"));
}

// ============================================================================
// Project lifecycle
// ============================================================================

#[test]
fn test_create_push_status_pull() {
    let sandbox = Sandbox::new();
    sandbox
        .clasp()
        .args(["create", "--title", "E2E"])
        .assert()
        .success()
        .stdout(predicate::str::contains("appsscript.json"));
    assert!(sandbox.dir().join("appsscript.json").is_file());

    fs::write(sandbox.dir().join("Code.gs"), "function main() {}\n").unwrap();
    fs::write(sandbox.dir().join(".claspignore"), "*.tmp\n").unwrap();
    fs::write(sandbox.dir().join("notes.tmp"), "").unwrap();

    sandbox
        .clasp()
        .args(["status", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"filesToPush\""))
        .stdout(predicate::str::contains("notes.tmp"));

    sandbox
        .clasp()
        .arg("push")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pushed"))
        .stdout(predicate::str::contains("Code.gs"));

    fs::remove_file(sandbox.dir().join("Code.gs")).unwrap();
    sandbox.clasp().arg("pull").assert().success();
    assert_eq!(
        fs::read_to_string(sandbox.dir().join("Code.gs")).unwrap(),
        "function main() {}\n"
    );
}

#[test]
fn test_clone_into_second_directory() {
    let sandbox = Sandbox::new();
    sandbox.clasp().args(["create", "--title", "Shared"]).assert().success();
    let script_id = sandbox.script_id();

    let other = TempDir::new().unwrap();
    sandbox
        .clasp()
        .current_dir(other.path())
        .args(["clone", &script_id])
        .assert()
        .success();

    assert!(other.path().join("appsscript.json").is_file());
}

#[test]
fn test_create_twice_fails() {
    let sandbox = Sandbox::new();
    sandbox.clasp().arg("create").assert().success();
    sandbox
        .clasp()
        .arg("create")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exist"));
}

// ============================================================================
// Versions and deployments
// ============================================================================

#[test]
fn test_deploy_and_redeploy() {
    let sandbox = Sandbox::new();
    sandbox.clasp().arg("create").assert().success();
    sandbox.clasp().args(["version", "first"]).assert().success();

    sandbox
        .clasp()
        .args(["deploy", "--description", "release"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created version"))
        .stdout(predicate::str::contains("@2"));

    sandbox
        .clasp()
        .arg("versions")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 Versions"));

    sandbox
        .clasp()
        .arg("deployments")
        .assert()
        .success()
        .stdout(predicate::str::contains("@HEAD"))
        .stdout(predicate::str::contains("@2 - release"));
}

#[test]
fn test_deploy_missing_version_fails() {
    let sandbox = Sandbox::new();
    sandbox.clasp().arg("create").assert().success();
    sandbox
        .clasp()
        .args(["deploy", "-V", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Version 7 does not exist"));
}

#[test]
fn test_undeploy_all_keeps_head() {
    let sandbox = Sandbox::new();
    sandbox.clasp().arg("create").assert().success();
    sandbox.clasp().arg("deploy").assert().success();
    sandbox.clasp().arg("deploy").assert().success();

    sandbox
        .clasp()
        .args(["undeploy", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Undeployed 2 deployments"));

    sandbox
        .clasp()
        .arg("deployments")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 Deployments"));
}

// ============================================================================
// Misc
// ============================================================================

#[test]
fn test_open_prints_editor_url() {
    let sandbox = Sandbox::new();
    sandbox.clasp().arg("create").assert().success();
    let script_id = sandbox.script_id();

    sandbox
        .clasp()
        .arg("open")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "https://script.google.com/d/{}/edit",
            script_id
        )));
}

#[test]
fn test_list_shows_created_projects() {
    let sandbox = Sandbox::new();
    sandbox.clasp().args(["create", "--title", "Listed"]).assert().success();

    sandbox
        .clasp()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Listed"));
}

#[test]
fn test_logs_require_setup() {
    let sandbox = Sandbox::new();
    sandbox.clasp().arg("create").assert().success();

    sandbox
        .clasp()
        .arg("logs")
        .assert()
        .failure()
        .stderr(predicate::str::contains("projectId"));

    sandbox
        .clasp()
        .args(["logs", "--setup", "--project-id", "gcp-1"])
        .assert()
        .success();
    sandbox.clasp().args(["logs", "--json"]).assert().success();
}
