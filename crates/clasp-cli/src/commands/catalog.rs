//! List and logs commands

use clasp_core::catalog::{list_logs, list_script_projects, setup_logs};
use colored::Colorize;

use crate::context::Context;
use crate::error::Result;
use crate::interactive;

/// Run the list command
pub async fn run_list(ctx: &Context) -> Result<()> {
    let files = list_script_projects(ctx.services.drive.as_ref()).await?;
    if files.is_empty() {
        println!("{}", "No script projects found.".dimmed());
        return Ok(());
    }
    for file in &files {
        println!("{:<30} {}", file.name, file.id.dimmed());
    }
    Ok(())
}

/// Run the logs command
pub async fn run_logs(
    ctx: &Context,
    setup: bool,
    project_id: Option<String>,
    json: bool,
) -> Result<()> {
    let mut project = ctx.project()?;

    if setup {
        let project_id = match project_id {
            Some(id) => id,
            None => interactive::prompt_project_id()?,
        };
        setup_logs(&mut project, &project_id)?;
        println!("{} {}", "Saved projectId".green(), project_id.cyan());
        return Ok(());
    }

    let entries = list_logs(ctx.services.logs.as_ref(), &project).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for entry in &entries {
        let severity = match entry.severity.as_str() {
            "ERROR" => entry.severity.red().to_string(),
            "WARNING" => entry.severity.yellow().to_string(),
            _ => entry.severity.dimmed().to_string(),
        };
        println!(
            "{:<10} {} {:<20} {}",
            severity,
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.function_name.as_deref().unwrap_or("-"),
            entry.message
        );
    }
    Ok(())
}
