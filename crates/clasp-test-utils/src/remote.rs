//! Seeded in-memory remotes.

use std::sync::Arc;

use chrono::Utc;
use clasp_core::remote::{MemoryServices, ProjectState};

/// A remote holding one fresh project with the default manifest.
pub fn seeded_remote(script_id: &str) -> Arc<MemoryServices> {
    let services = Arc::new(MemoryServices::new());
    services.insert_project(ProjectState::new(script_id, "Test Project", None, Utc::now()));
    services
}

/// A remote whose project already has `count` versions, numbered from 1.
pub fn with_versions(script_id: &str, count: u32) -> Arc<MemoryServices> {
    let mut state = ProjectState::new(script_id, "Test Project", None, Utc::now());
    for n in 1..=count {
        state.create_version(&format!("v{}", n), Utc::now());
    }
    let services = Arc::new(MemoryServices::new());
    services.insert_project(state);
    services
}
