//! FabricFlow deployment pipeline
//!
//! Pushes every discovered workspace folder to Microsoft Fabric, one after
//! another, and keeps going when a workspace fails.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                fabric-deploy CLI                 │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │               fabricflow-deploy                  │
//! │  discover ─▶ deploy_all_workspaces ─▶ report     │
//! │                   │                              │
//! │          deploy_workspace (per folder,           │
//! │          failures become DeploymentResult)       │
//! │                   │                              │
//! │  ┌────────────────▼─────────────────────────┐   │
//! │  │   trait DeployBackend { ... }             │   │
//! │  └────────────────┬─────────────────────────┘   │
//! └───────────────────┼─────────────────────────────┘
//!                     │
//!             ┌───────▼───────┐
//!             │  fabric-cicd  │
//!             │ (Python SDK)  │
//!             └───────────────┘
//! ```

pub mod backend;
pub mod deployer;
pub mod fabric_cicd;
pub mod orchestrator;
pub mod report;

#[cfg(test)]
mod testing;

// Re-exports
pub use backend::{DEFAULT_FEATURE_FLAGS, DeployBackend, SdkLogLevel, configure_backend};
pub use deployer::deploy_workspace;
pub use fabric_cicd::FabricCicd;
pub use orchestrator::{deploy_all_workspaces, discover_workspace_folders, run_deployment_pipeline};
pub use report::{
    DeploymentReport, RESULTS_FILENAME, SEPARATOR_LONG, SEPARATOR_SHORT, WorkspaceReport,
    WorkspaceStatus, print_header, print_summary, render_summary, write_report,
};
