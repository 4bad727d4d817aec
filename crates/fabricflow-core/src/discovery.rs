//! ワークスペースフォルダの自動発見
//!
//! ルートディレクトリ直下で `config.yml` を持つフォルダをデプロイ対象とみなします。

use crate::config::CONFIG_FILE;
use crate::error::{DeployError, Result};
use std::path::Path;
use tracing::{debug, info, warn};

/// デプロイ対象のワークスペースフォルダを発見
///
/// フォルダ名をアルファベット順にソートして返す。
/// 対象が1つも見つからない場合はエラー。
#[tracing::instrument(fields(workspaces_dir = %workspaces_dir.display()))]
pub fn discover_workspaces(workspaces_dir: &Path) -> Result<Vec<String>> {
    if !workspaces_dir.is_dir() {
        warn!("Workspaces directory does not exist");
        return Err(DeployError::WorkspacesDirNotFound(
            workspaces_dir.to_path_buf(),
        ));
    }

    let entries = std::fs::read_dir(workspaces_dir).map_err(|e| DeployError::DiscoveryError {
        path: workspaces_dir.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut folders = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| DeployError::DiscoveryError {
            path: workspaces_dir.to_path_buf(),
            message: e.to_string(),
        })?;
        let path = entry.path();

        if !path.is_dir() {
            continue;
        }
        if !path.join(CONFIG_FILE).is_file() {
            debug!(folder = %path.display(), "Skipping folder without {}", CONFIG_FILE);
            continue;
        }

        match entry.file_name().into_string() {
            Ok(name) => folders.push(name),
            Err(name) => {
                warn!(folder = ?name, "Skipping folder with non UTF-8 name");
            }
        }
    }

    if folders.is_empty() {
        return Err(DeployError::NoWorkspaces {
            dir: workspaces_dir.to_path_buf(),
            file: CONFIG_FILE,
        });
    }

    // 実行順を再現可能にするためアルファベット順
    folders.sort();

    info!(workspace_count = folders.len(), "Discovered workspace folders");
    Ok(folders)
}
