//! [`TestProject`] builder for clasp test scenarios.

use std::fs;
use std::path::Path;

use clasp_core::{Project, ProjectSettings};
use tempfile::TempDir;

/// A temporary project directory with helpers for setup and assertion.
///
/// # Example
///
/// ```rust,no_run
/// use clasp_test_utils::TestProject;
///
/// let project = TestProject::new()
///     .with_settings("script-1")
///     .with_file("appsscript.json", "{}")
///     .with_file("Code.gs", "function main() {}");
/// project.assert_file_exists("Code.gs");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the project directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `.clasp.json` with only a script id.
    pub fn with_settings(self, script_id: &str) -> Self {
        self.with_project_settings(ProjectSettings::new(script_id))
    }

    /// Write `.clasp.json` from full settings.
    pub fn with_project_settings(self, settings: ProjectSettings) -> Self {
        Project::new(self.root(), settings).save().unwrap();
        self
    }

    /// Write `.claspignore` with one pattern per line.
    pub fn with_ignore(self, patterns: &[&str]) -> Self {
        let mut content = patterns.join("\n");
        content.push('\n');
        fs::write(self.root().join(".claspignore"), content).unwrap();
        self
    }

    /// Write a file relative to the project directory, creating parents.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.write(path, content);
        self
    }

    pub fn write(&self, path: &str, content: &str) {
        let full = self.root().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full, content).unwrap();
    }

    pub fn remove(&self, path: &str) {
        fs::remove_file(self.root().join(path)).unwrap();
    }

    pub fn read(&self, path: &str) -> String {
        let full = self.root().join(path);
        fs::read_to_string(&full)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full.display()))
    }

    /// Load the project handle from `.clasp.json`.
    pub fn project(&self) -> Project {
        Project::load(self.root()).unwrap()
    }

    /// Assert that `path` (relative to the project directory) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the project directory) does **not** exist.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }
}
