//! Read-only listings: script projects in Drive and execution logs

use crate::remote::{DriveFile, DriveService, LogEntry, LogService, SCRIPT_MIME_TYPE};
use crate::settings::Project;
use crate::{Error, Result};

/// Number of log entries requested per listing
pub const LOG_PAGE_SIZE: usize = 50;

/// Every script project visible in Drive, all pages aggregated
///
/// # Errors
///
/// Returns [`Error::ServiceUnusable`] when a page arrives without a file
/// list.
pub async fn list_script_projects(drive: &dyn DriveService) -> Result<Vec<DriveFile>> {
    let mut files = Vec::new();
    let mut page_token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = drive
            .list_files(SCRIPT_MIME_TYPE, page_token.as_deref())
            .await?;
        pages += 1;
        let Some(batch) = page.files else {
            return Err(Error::ServiceUnusable {
                service: "Drive".to_string(),
            });
        };
        files.extend(batch);

        match page.next_page_token {
            Some(token) if !token.is_empty() => page_token = Some(token),
            _ => break,
        }
    }

    tracing::debug!(pages, files = files.len(), "listed script projects");
    Ok(files)
}

/// Recent log entries for the project's cloud project, newest first
///
/// # Errors
///
/// Returns [`Error::MissingProjectId`] before any remote call when the
/// settings carry no `projectId`.
pub async fn list_logs(logs: &dyn LogService, project: &Project) -> Result<Vec<LogEntry>> {
    let project_id = project
        .settings
        .project_id
        .as_deref()
        .filter(|id| !id.trim().is_empty())
        .ok_or(Error::MissingProjectId)?;

    Ok(logs.list_entries(project_id, LOG_PAGE_SIZE).await?)
}

/// Store the cloud project id used for log listings
pub fn setup_logs(project: &mut Project, project_id: &str) -> Result<()> {
    project.settings.set("projectId", project_id)?;
    project.save()?;
    tracing::info!(project_id, "stored projectId");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::{MemoryServices, ProjectState};
    use crate::settings::ProjectSettings;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_listing_aggregates_pages() {
        let services = MemoryServices::with_page_size(2);
        for i in 0..5 {
            services.insert_project(ProjectState::new(
                format!("id{}", i),
                format!("Script {}", i),
                None,
                Utc::now(),
            ));
        }

        let files = list_script_projects(&services).await.unwrap();

        let ids: Vec<&str> = files.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["id0", "id1", "id2", "id3", "id4"]);
    }

    #[tokio::test]
    async fn test_page_without_files_is_unusable() {
        let services = MemoryServices::new();
        services.break_drive();

        let err = list_script_projects(&services).await.unwrap_err();
        assert!(matches!(err, Error::ServiceUnusable { .. }));
    }

    #[tokio::test]
    async fn test_logs_require_project_id() {
        let services = MemoryServices::new();
        let project = Project::new("/tmp/p", ProjectSettings::new("s1"));

        let err = list_logs(&services, &project).await.unwrap_err();
        assert!(matches!(err, Error::MissingProjectId));
    }

    #[tokio::test]
    async fn test_setup_then_list_logs() {
        let temp = TempDir::new().unwrap();
        let mut project = Project::init(temp.path(), ProjectSettings::new("s1")).unwrap();
        let services = MemoryServices::new();
        for (minute, message) in [(1, "older"), (2, "newer")] {
            services.add_log(
                "gcp-1",
                LogEntry {
                    timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, minute, 0).unwrap(),
                    severity: "INFO".to_string(),
                    function_name: Some("main".to_string()),
                    message: message.to_string(),
                },
            );
        }

        setup_logs(&mut project, "gcp-1").unwrap();
        let reloaded = Project::load(temp.path()).unwrap();
        let entries = list_logs(&services, &reloaded).await.unwrap();

        let messages: Vec<&str> = entries.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["newer", "older"]);
    }
}
