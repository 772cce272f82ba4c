//! Interactive prompts for CLI commands
//!
//! Uses dialoguer for terminal-based interactive selection.

use clasp_core::DriveFile;
use dialoguer::{Input, Select};

use crate::error::{CliError, Result};

/// Let the user pick one script project; returns its id
pub fn select_script(files: &[DriveFile]) -> Result<String> {
    if files.is_empty() {
        return Err(CliError::user(
            "No script projects found. Create one with `clasp create`.",
        ));
    }

    let items: Vec<String> = files
        .iter()
        .map(|f| format!("{:<30} {}", f.name, f.id))
        .collect();
    let idx = Select::new()
        .with_prompt("Clone which script?")
        .items(&items)
        .default(0)
        .interact()?;

    Ok(files[idx].id.clone())
}

/// Ask for the cloud project id used by `logs`
pub fn prompt_project_id() -> Result<String> {
    let id: String = Input::new()
        .with_prompt("Cloud project id")
        .interact_text()?;
    let id = id.trim().to_string();
    if id.is_empty() {
        return Err(CliError::user("A project id is required"));
    }
    Ok(id)
}
