//! Single-workspace deployment
//!
//! Every failure is converted into a [`DeploymentResult`] here, so one broken
//! workspace never stops the rest of the batch.

use crate::backend::DeployBackend;
use crate::report::SEPARATOR_SHORT;
use colored::Colorize;
use fabricflow_auth::TokenCredential;
use fabricflow_core::{DeploymentResult, Environment, Result, WorkspaceConfig};
use std::path::{Path, PathBuf};

/// Deploy one workspace folder
///
/// Never fails: config errors, missing workspace names and SDK errors all end
/// up as a failed [`DeploymentResult`]. When the failure happens before the
/// workspace name is known, the folder name is used instead.
#[tracing::instrument(skip_all, fields(workspace_folder = %workspace_folder, environment = %environment))]
pub async fn deploy_workspace(
    backend: &dyn DeployBackend,
    workspaces_dir: &Path,
    workspace_folder: &str,
    environment: Environment,
    credential: &dyn TokenCredential,
) -> DeploymentResult {
    println!();
    println!("{}", SEPARATOR_SHORT);
    println!("Deploying workspace: {}", workspace_folder.cyan().bold());
    println!("{}", SEPARATOR_SHORT);
    println!();

    let target = match load_target(workspaces_dir, workspace_folder, environment) {
        Ok(target) => target,
        Err(e) => return failed(workspace_folder, workspace_folder, e),
    };
    let workspace_name = target.name.as_str();

    println!("-> Target workspace: {}", workspace_name.cyan());
    println!("-> Config file: {}", target.path.display());
    println!("-> Environment: {}", environment);
    println!("-> Deploying items using config-based deployment...");

    match backend
        .deploy_with_config(&target.path, environment, credential)
        .await
    {
        Ok(()) => {
            println!();
            println!(
                "{} Deployment to {} completed successfully!",
                "[OK]".green().bold(),
                workspace_name.cyan()
            );
            println!();
            tracing::info!(workspace_name = %workspace_name, "Workspace deployed");
            DeploymentResult::succeeded(workspace_folder, workspace_name)
        }
        Err(e) => failed(workspace_folder, workspace_name, e),
    }
}

struct DeployTarget {
    name: String,
    path: PathBuf,
}

fn load_target(
    workspaces_dir: &Path,
    workspace_folder: &str,
    environment: Environment,
) -> Result<DeployTarget> {
    let config = WorkspaceConfig::load(workspaces_dir, workspace_folder)?;
    let name = config.workspace_name(environment)?.to_string();
    Ok(DeployTarget {
        name,
        path: config.path().to_path_buf(),
    })
}

fn failed(
    workspace_folder: &str,
    display_name: &str,
    error: fabricflow_core::DeployError,
) -> DeploymentResult {
    let message = error.to_string();
    eprintln!();
    eprintln!(
        "{} ERROR: Deployment failed for workspace '{}': {}",
        "[FAIL]".red().bold(),
        display_name,
        message
    );
    eprintln!();
    tracing::warn!(kind = %error.kind(), "Workspace deployment failed");
    DeploymentResult::failed(workspace_folder, display_name, message)
}
