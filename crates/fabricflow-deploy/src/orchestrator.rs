//! Batch orchestration
//!
//! Workspaces are deployed strictly one after another, in discovery order.
//! A failed workspace is recorded and the batch moves on.

use crate::backend::DeployBackend;
use crate::deployer::deploy_workspace;
use colored::Colorize;
use fabricflow_auth::TokenCredential;
use fabricflow_core::{DeploymentResult, DeploymentSummary, Environment, Result, discover_workspaces};
use std::path::Path;
use std::time::Instant;

/// Discover the workspace folders to deploy and log them
pub fn discover_workspace_folders(workspaces_dir: &Path) -> Result<Vec<String>> {
    let folders = discover_workspaces(workspaces_dir)?;
    println!(
        "-> Discovered {} workspace(s): {}",
        folders.len(),
        folders.join(", ")
    );
    println!();
    Ok(folders)
}

/// Deploy every folder in order and collect one result per folder
pub async fn deploy_all_workspaces(
    backend: &dyn DeployBackend,
    workspace_folders: &[String],
    workspaces_dir: &Path,
    environment: Environment,
    credential: &dyn TokenCredential,
) -> Vec<DeploymentResult> {
    let total = workspace_folders.len();
    println!("Starting deployment of {} workspace(s)...", total);
    println!();

    let mut results = Vec::with_capacity(total);
    for (i, workspace_folder) in workspace_folders.iter().enumerate() {
        println!(
            "{} Processing workspace: {}",
            format!("[{}/{}]", i + 1, total).bold(),
            workspace_folder.cyan()
        );

        let result =
            deploy_workspace(backend, workspaces_dir, workspace_folder, environment, credential)
                .await;
        results.push(result);
    }

    results
}

/// Discovery, batch deployment and timing
///
/// Only discovery can fail; per-workspace failures are part of the summary.
#[tracing::instrument(skip(backend, credential), fields(workspaces_dir = %workspaces_dir.display()))]
pub async fn run_deployment_pipeline(
    backend: &dyn DeployBackend,
    workspaces_dir: &Path,
    environment: Environment,
    credential: &dyn TokenCredential,
) -> Result<DeploymentSummary> {
    let workspace_folders = discover_workspace_folders(workspaces_dir)?;

    let started = Instant::now();
    let results = deploy_all_workspaces(
        backend,
        &workspace_folders,
        workspaces_dir,
        environment,
        credential,
    )
    .await;
    let duration = started.elapsed();

    let summary = DeploymentSummary::new(environment, duration, results);
    tracing::info!(
        total = summary.total_workspaces(),
        failed = summary.failed_count(),
        duration_secs = summary.duration_secs(),
        "Deployment batch finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeBackend, ambient, write_config, write_dev_workspace};
    use fabricflow_core::ErrorKind;
    use std::fs;

    #[tokio::test]
    async fn test_pipeline_deploys_in_discovery_order_and_skips_folders_without_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        write_dev_workspace(root, "B");
        write_dev_workspace(root, "A");
        fs::create_dir(root.join("C")).unwrap();

        let backend = FakeBackend::default();
        let summary = run_deployment_pipeline(&backend, root, Environment::Dev, &ambient())
            .await
            .unwrap();

        assert_eq!(backend.called_folders(), vec!["A", "B"]);
        assert_eq!(summary.total_workspaces(), 2);
        assert_eq!(summary.successful_count(), 2);
        assert_eq!(summary.environment(), Environment::Dev);

        let names: Vec<_> = summary.results().iter().map(|r| r.workspace_name()).collect();
        assert_eq!(names, vec!["[D] A", "[D] B"]);
    }

    #[tokio::test]
    async fn test_batch_continues_after_failures() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        let folders: Vec<String> = ["W1", "W2", "W3", "W4", "W5"]
            .iter()
            .map(|f| f.to_string())
            .collect();
        for folder in &folders {
            write_dev_workspace(root, folder);
        }

        let backend = FakeBackend::failing("W1", "unauthorized").and_failing("W4", "timeout");
        let results =
            deploy_all_workspaces(&backend, &folders, root, Environment::Dev, &ambient()).await;

        assert_eq!(backend.called_folders(), folders);
        assert_eq!(results.len(), 5);

        let order: Vec<_> = results.iter().map(|r| r.workspace_folder()).collect();
        assert_eq!(order, vec!["W1", "W2", "W3", "W4", "W5"]);

        let summary = DeploymentSummary::new(Environment::Dev, Default::default(), results);
        assert_eq!(summary.failed_count(), 2);
        assert_eq!(summary.successful_count(), 3);
        assert_eq!(summary.results()[3].error_message(), "timeout");
    }

    #[tokio::test]
    async fn test_config_failures_do_not_abort_batch() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        write_dev_workspace(root, "Good");
        // no dev entry
        write_config(root, "NoDev", "core:\n  workspace:\n    prod: \"[P] NoDev\"\n");
        write_config(root, "Broken", "core: [oops\n");

        let backend = FakeBackend::default();
        let summary = run_deployment_pipeline(&backend, root, Environment::Dev, &ambient())
            .await
            .unwrap();

        assert_eq!(summary.total_workspaces(), 3);
        assert_eq!(summary.failed_count(), 2);
        assert_eq!(backend.called_folders(), vec!["Good"]);

        let broken = &summary.results()[0];
        assert_eq!(broken.workspace_folder(), "Broken");
        assert_eq!(broken.workspace_name(), "Broken");
        assert!(!broken.success());
    }

    #[tokio::test]
    async fn test_missing_root_fails_before_any_deployment() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = FakeBackend::default();

        let err = run_deployment_pipeline(
            &backend,
            &temp_dir.path().join("missing"),
            Environment::Dev,
            &ambient(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_root_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = FakeBackend::default();

        let err = run_deployment_pipeline(&backend, temp_dir.path(), Environment::Dev, &ambient())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
