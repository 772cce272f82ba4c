//! Pull, push and status commands

use clasp_core::{PushReport, PushWatcher, SyncEngine, run_watch};
use colored::Colorize;

use crate::context::Context;
use crate::error::Result;

fn engine(ctx: &Context) -> Result<SyncEngine> {
    let project = ctx.project()?;
    Ok(SyncEngine::new(&project, ctx.services.script.clone()))
}

/// Run the pull command
pub async fn run_pull(ctx: &Context, version: Option<u32>) -> Result<()> {
    let files = engine(ctx)?.fetch_project(version).await?;
    for file in &files {
        println!("  {} {}", "└─".dimmed(), file.relative_path);
    }
    println!("Cloned {} files.", files.len());
    Ok(())
}

/// Run the push command
pub async fn run_push(ctx: &Context, watch: bool) -> Result<()> {
    let engine = engine(ctx)?;
    if !watch {
        let report = engine.push_files().await?;
        print_report(&report);
        return Ok(());
    }

    let (_watcher, triggers) = PushWatcher::start(&engine)?;
    println!("{} (Ctrl-C to stop)", "Waiting for changes...".cyan());
    run_watch(&engine, triggers, |result| match result {
        Ok(report) => print_report(&report),
        Err(e) => eprintln!("{}: {}", "push failed".red().bold(), e),
    })
    .await;
    Ok(())
}

fn print_report(report: &PushReport) {
    if report.is_empty() {
        println!("{}", "Nothing to push.".dimmed());
        return;
    }
    for path in &report.pushed {
        println!("  {} {}", "└─".dimmed(), path);
    }
    println!("{} {} files.", "Pushed".green(), report.count());
}

/// Run the status command
pub fn run_status(ctx: &Context, json: bool) -> Result<()> {
    let status = engine(ctx)?.status()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "Tracked files:".bold());
    for path in &status.files_to_push {
        println!("  {} {}", "└─".green(), path);
    }
    println!("{}", "Untracked files:".bold());
    for path in &status.untracked_files {
        println!("  {} {}", "└─".dimmed(), path.dimmed());
    }
    Ok(())
}
