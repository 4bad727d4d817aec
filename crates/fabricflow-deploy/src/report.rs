//! Deployment reporting
//!
//! Console summary for humans, JSON payload for workflow summary scripts.

use colored::Colorize;
use fabricflow_core::{DeploymentSummary, Environment};
use serde::Serialize;
use std::path::Path;

/// Results payload written next to the working directory
pub const RESULTS_FILENAME: &str = "deployment-results.json";

pub const SEPARATOR_LONG: &str =
    "============================================================";
pub const SEPARATOR_SHORT: &str =
    "------------------------------------------------------------";

/// Outcome of one workspace in the JSON payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceStatus {
    Success,
    Failure,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkspaceReport {
    /// Workspace folder
    pub name: String,
    /// Resolved display name
    pub full_name: String,
    pub status: WorkspaceStatus,
    pub error: String,
}

/// Machine-readable deployment summary
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentReport {
    pub environment: Environment,
    pub duration: f64,
    pub total_workspaces: usize,
    pub successful_count: usize,
    pub failed_count: usize,
    /// Sorted by folder name, independent of deployment order
    pub workspaces: Vec<WorkspaceReport>,
}

impl From<&DeploymentSummary> for DeploymentReport {
    fn from(summary: &DeploymentSummary) -> Self {
        let mut workspaces: Vec<WorkspaceReport> = summary
            .results()
            .iter()
            .map(|result| WorkspaceReport {
                name: result.workspace_folder().to_string(),
                full_name: result.workspace_name().to_string(),
                status: if result.success() {
                    WorkspaceStatus::Success
                } else {
                    WorkspaceStatus::Failure
                },
                error: result.error_message().to_string(),
            })
            .collect();
        workspaces.sort_by(|a, b| a.name.cmp(&b.name));

        Self {
            environment: summary.environment(),
            duration: summary.duration_secs(),
            total_workspaces: summary.total_workspaces(),
            successful_count: summary.successful_count(),
            failed_count: summary.failed_count(),
            workspaces,
        }
    }
}

/// Write the JSON payload to `path`
pub fn write_report(summary: &DeploymentSummary, path: &Path) -> std::io::Result<()> {
    let report = DeploymentReport::from(summary);
    let mut json = serde_json::to_string_pretty(&report)?;
    json.push('\n');
    std::fs::write(path, json)?;
    tracing::debug!(path = %path.display(), "Wrote deployment results");
    Ok(())
}

/// Header printed before any work starts
pub fn print_header(environment: &str, workspaces_dir: &Path) {
    println!();
    println!("{}", SEPARATOR_LONG);
    println!("{}", "FABRIC MULTI-WORKSPACE DEPLOYMENT".bold());
    println!("{}", SEPARATOR_LONG);
    println!("Environment: {}", environment.to_uppercase().cyan());
    println!("Workspaces directory: {}", workspaces_dir.display());
    println!("{}", SEPARATOR_LONG);
    println!();
}

/// Render the console summary
pub fn render_summary(summary: &DeploymentSummary) -> String {
    let mut out = String::new();

    out.push('\n');
    out.push_str(&format!("{}\n", SEPARATOR_LONG));
    out.push_str(&format!("{}\n", "DEPLOYMENT SUMMARY".bold()));
    out.push_str(&format!("{}\n", SEPARATOR_LONG));
    out.push_str(&format!("Environment: {}\n", summary.environment().upper()));
    out.push_str(&format!("Duration: {:.2} seconds\n", summary.duration_secs()));
    out.push_str(&format!("Total workspaces: {}\n", summary.total_workspaces()));
    out.push_str(&format!("Successful: {}\n", summary.successful_count()));
    out.push_str(&format!("Failed: {}\n", summary.failed_count()));
    out.push_str(&format!("{}\n", SEPARATOR_LONG));

    let (successful, failed): (Vec<_>, Vec<_>) =
        summary.results().iter().partition(|r| r.success());

    if !successful.is_empty() {
        out.push_str(&format!("\n{} SUCCESSFUL DEPLOYMENTS:\n", "[OK]".green().bold()));
        for result in &successful {
            out.push_str(&format!("  {} {}\n", "[OK]".green(), result.workspace_name()));
        }
    }

    if !failed.is_empty() {
        out.push_str(&format!("\n{} FAILED DEPLOYMENTS:\n", "[FAIL]".red().bold()));
        for result in &failed {
            out.push_str(&format!("  {} {}\n", "[FAIL]".red(), result.workspace_name()));
            out.push_str(&format!("    Error: {}\n", result.error_message()));
        }
    }

    out.push('\n');
    out.push_str(&format!("{}\n", SEPARATOR_LONG));
    out
}

pub fn print_summary(summary: &DeploymentSummary) {
    print!("{}", render_summary(summary));
}
