//! Create and clone commands

use clasp_core::catalog::list_script_projects;
use clasp_core::{Bootstrapped, ProjectLayout, clone_project, create_project};
use colored::Colorize;

use crate::context::Context;
use crate::error::Result;
use crate::interactive;

fn layout(ctx: &Context, root_dir: Option<String>) -> ProjectLayout {
    ProjectLayout {
        root_dir,
        file_extension: ctx.config.default_extension,
    }
}

/// Run the create command
pub async fn run_create(
    ctx: &Context,
    title: &str,
    parent_id: Option<&str>,
    root_dir: Option<String>,
) -> Result<()> {
    let created = create_project(
        ctx.services.script.as_ref(),
        ctx.cwd(),
        title,
        parent_id,
        &layout(ctx, root_dir),
    )
    .await?;

    println!(
        "{} {} ({})",
        "Created project".green(),
        title.bold(),
        created.project.script_id().cyan()
    );
    print_files(&created);
    Ok(())
}

/// Run the clone command
pub async fn run_clone(
    ctx: &Context,
    script_id: Option<String>,
    version: Option<u32>,
    root_dir: Option<String>,
) -> Result<()> {
    let script_id = match script_id {
        Some(id) => id,
        None => {
            let files = list_script_projects(ctx.services.drive.as_ref()).await?;
            interactive::select_script(&files)?
        }
    };

    let cloned = clone_project(
        ctx.services.script.as_ref(),
        ctx.cwd(),
        &script_id,
        version,
        &layout(ctx, root_dir),
    )
    .await?;

    println!("{} {}", "Cloned project".green(), script_id.cyan());
    print_files(&cloned);
    Ok(())
}

fn print_files(bootstrapped: &Bootstrapped) {
    for file in &bootstrapped.files {
        println!("  {} {}", "└─".dimmed(), file.relative_path);
    }
    println!("Cloned {} files.", bootstrapped.files.len());
}
