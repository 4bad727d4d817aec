//! FabricFlow のコア機能
//!
//! ワークスペースフォルダの発見、`config.yml` の読み込み、
//! デプロイ結果のモデルを提供します。

pub mod config;
pub mod discovery;
pub mod environment;
pub mod error;
pub mod model;

pub use config::{CONFIG_FILE, WorkspaceConfig, config_path};
pub use discovery::discover_workspaces;
pub use environment::{ENV_ACTIONS_RUNNER_DEBUG, ENV_GITHUB_ACTIONS, Environment, flag_enabled};
pub use error::{DeployError, ErrorKind, Result};
pub use model::{DeploymentOutcome, DeploymentResult, DeploymentSummary};
