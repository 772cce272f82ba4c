//! Version and deployment commands

use clasp_core::{Deployment, DeploymentManager};
use colored::Colorize;

use crate::context::Context;
use crate::error::{CliError, Result};

fn manager(ctx: &Context) -> Result<DeploymentManager> {
    let project = ctx.project()?;
    Ok(DeploymentManager::new(
        ctx.services.script.clone(),
        project.script_id(),
    ))
}

/// Run the version command
pub async fn run_version(ctx: &Context, description: &str) -> Result<()> {
    let version = manager(ctx)?.create_version(description).await?;
    println!("{} {}.", "Created version".green(), version.version_number);
    Ok(())
}

/// Run the versions command
pub async fn run_versions(ctx: &Context) -> Result<()> {
    let versions = manager(ctx)?.list_versions().await?;
    if versions.is_empty() {
        println!("{}", "No versions.".dimmed());
        return Ok(());
    }

    println!("{} {}", versions.len(), "Versions".bold());
    for version in &versions {
        let description = if version.description.is_empty() {
            "(no description)".dimmed().to_string()
        } else {
            version.description.clone()
        };
        println!("{:>4} - {}", version.version_number, description);
    }
    Ok(())
}

/// Run the deploy command
///
/// With a deployment id this repoints that deployment, minting a version
/// first when none is given.
pub async fn run_deploy(
    ctx: &Context,
    version_number: Option<u32>,
    description: &str,
    deployment_id: Option<&str>,
) -> Result<()> {
    let manager = manager(ctx)?;

    let deployment = match deployment_id {
        Some(id) => {
            let version = match version_number {
                Some(n) => n,
                None => manager.create_version(description).await?.version_number,
            };
            manager.redeploy(id, version, description).await?
        }
        None => {
            let outcome = manager.deploy(version_number, description).await?;
            if let Some(created) = outcome.created_version {
                println!("{} {}.", "Created version".green(), created.version_number);
            }
            outcome.deployment
        }
    };

    println!("{}", format_deployment(&deployment));
    Ok(())
}

/// Run the redeploy command
pub async fn run_redeploy(
    ctx: &Context,
    deployment_id: &str,
    version: u32,
    description: &str,
) -> Result<()> {
    let deployment = manager(ctx)?
        .redeploy(deployment_id, version, description)
        .await?;
    println!("{}", format_deployment(&deployment));
    Ok(())
}

/// Run the undeploy command
///
/// Without an id the most recent versioned deployment is removed.
pub async fn run_undeploy(ctx: &Context, deployment_id: Option<&str>, all: bool) -> Result<()> {
    let manager = manager(ctx)?;

    if all {
        let removed = manager.undeploy_all().await?;
        for id in &removed {
            println!("{} {}", "Undeployed".green(), id);
        }
        println!("Undeployed {} deployments.", removed.len());
        return Ok(());
    }

    let id = match deployment_id {
        Some(id) => id.to_string(),
        None => manager
            .list_deployments()
            .await?
            .into_iter()
            .rev()
            .find(|d| !d.is_head())
            .map(|d| d.deployment_id)
            .ok_or_else(|| CliError::user("No deployments to undeploy"))?,
    };

    manager.undeploy(&id).await?;
    println!("{} {}", "Undeployed".green(), id);
    Ok(())
}

/// Run the deployments command
pub async fn run_deployments(ctx: &Context) -> Result<()> {
    let deployments = manager(ctx)?.list_deployments().await?;
    println!("{} {}", deployments.len(), "Deployments".bold());
    for deployment in &deployments {
        println!("{}", format_deployment(deployment));
    }
    Ok(())
}

fn format_deployment(deployment: &Deployment) -> String {
    let mut line = format!(
        "- {} {}",
        deployment.deployment_id.cyan(),
        deployment.version_label()
    );
    if !deployment.description.is_empty() {
        line.push_str(&format!(" - {}", deployment.description));
    }
    line
}
