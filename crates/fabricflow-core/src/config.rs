//! ワークスペース設定 (`config.yml`) の読み込み

use crate::environment::Environment;
use crate::error::{DeployError, Result};
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// ワークスペースフォルダを識別する設定ファイル名
pub const CONFIG_FILE: &str = "config.yml";

/// `<workspaces_dir>/<folder>/config.yml`
pub fn config_path(workspaces_dir: &Path, workspace_folder: &str) -> PathBuf {
    workspaces_dir.join(workspace_folder).join(CONFIG_FILE)
}

/// パース済みのワークスペース設定
///
/// スキーマ検証は行わない。必要なのは `core.workspace.<environment>` だけ。
#[derive(Debug, Clone)]
pub struct WorkspaceConfig {
    path: PathBuf,
    document: Value,
}

impl WorkspaceConfig {
    /// ワークスペースフォルダの `config.yml` を読み込む
    #[tracing::instrument(skip(workspaces_dir), fields(workspaces_dir = %workspaces_dir.display()))]
    pub fn load(workspaces_dir: &Path, workspace_folder: &str) -> Result<Self> {
        let path = config_path(workspaces_dir, workspace_folder);
        if !path.is_file() {
            return Err(DeployError::ConfigNotFound {
                folder: workspace_folder.to_string(),
                file: CONFIG_FILE,
            });
        }

        let content = std::fs::read_to_string(&path)?;
        debug!(path = %path.display(), bytes = content.len(), "Loaded workspace config");
        Self::parse(path, &content)
    }

    pub fn parse(path: impl Into<PathBuf>, content: &str) -> Result<Self> {
        let path = path.into();
        let document = serde_yaml::from_str(content).map_err(|source| DeployError::ConfigParse {
            path: path.clone(),
            source,
        })?;
        Ok(Self { path, document })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `core.workspace.<environment>` のワークスペース表示名を取得
    pub fn workspace_name(&self, environment: Environment) -> Result<&str> {
        self.document
            .get("core")
            .and_then(|core| core.get("workspace"))
            .and_then(|workspace| workspace.get(environment.as_str()))
            .and_then(Value::as_str)
            .ok_or_else(|| DeployError::WorkspaceNameNotFound {
                environment: environment.to_string(),
                file: CONFIG_FILE,
            })
    }
}
