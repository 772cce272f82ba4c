//! clasp CLI
//!
//! The command-line interface for developing script projects locally.

mod cli;
mod commands;
mod context;
mod error;
mod interactive;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use context::Context;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let Some(command) = cli.command else {
        println!("{} develop script projects locally", "clasp".green().bold());
        println!();
        println!("Run {} for available commands.", "clasp --help".cyan());
        return Ok(());
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async {
        let cwd = std::env::current_dir()?;
        let ctx = Context::load(cwd, cli.remote_dir.as_deref())?;
        execute_command(&ctx, command).await
    })
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .try_init();
    if result.is_ok() {
        tracing::debug!("Verbose mode enabled");
    }
}

async fn execute_command(ctx: &Context, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Create {
            title,
            parent_id,
            root_dir,
        } => commands::run_create(ctx, &title, parent_id.as_deref(), root_dir).await,
        Commands::Clone {
            script_id,
            version,
            root_dir,
        } => commands::run_clone(ctx, script_id, version, root_dir).await,
        Commands::Pull { version } => commands::run_pull(ctx, version).await,
        Commands::Push { watch } => commands::run_push(ctx, watch).await,
        Commands::Status { json } => commands::run_status(ctx, json),
        Commands::Version { description } => {
            commands::run_version(ctx, description.as_deref().unwrap_or("")).await
        }
        Commands::Versions => commands::run_versions(ctx).await,
        Commands::Deploy {
            version_number,
            description,
            deployment_id,
        } => {
            commands::run_deploy(ctx, version_number, &description, deployment_id.as_deref())
                .await
        }
        Commands::Redeploy {
            deployment_id,
            version,
            description,
        } => {
            commands::run_redeploy(
                ctx,
                &deployment_id,
                version,
                description.as_deref().unwrap_or(""),
            )
            .await
        }
        Commands::Undeploy { deployment_id, all } => {
            commands::run_undeploy(ctx, deployment_id.as_deref(), all).await
        }
        Commands::Deployments => commands::run_deployments(ctx).await,
        Commands::List => commands::run_list(ctx).await,
        Commands::Logs {
            setup,
            project_id,
            json,
        } => commands::run_logs(ctx, setup, project_id, json).await,
        Commands::Run {
            function,
            params,
            dev_mode,
        } => commands::run_function(ctx, &function, params.as_deref(), dev_mode).await,
        Commands::Open => commands::run_open(ctx),
        Commands::Settings { key, value } => {
            commands::run_settings(ctx, key.as_deref(), value.as_deref())
        }
    }
}
