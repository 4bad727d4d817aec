//! デプロイ結果のモデル

use crate::environment::Environment;
use std::time::Duration;

/// 1ワークスペース分のデプロイ結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeploymentOutcome {
    Succeeded,
    Failed { error: String },
}

/// 1ワークスペースのデプロイ結果
///
/// 生成後は変更されない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentResult {
    workspace_folder: String,
    workspace_name: String,
    outcome: DeploymentOutcome,
}

impl DeploymentResult {
    pub fn succeeded(workspace_folder: impl Into<String>, workspace_name: impl Into<String>) -> Self {
        Self {
            workspace_folder: workspace_folder.into(),
            workspace_name: workspace_name.into(),
            outcome: DeploymentOutcome::Succeeded,
        }
    }

    pub fn failed(
        workspace_folder: impl Into<String>,
        workspace_name: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            workspace_folder: workspace_folder.into(),
            workspace_name: workspace_name.into(),
            outcome: DeploymentOutcome::Failed {
                error: error.into(),
            },
        }
    }

    pub fn workspace_folder(&self) -> &str {
        &self.workspace_folder
    }

    /// 解決済みの表示名（解決前に失敗した場合はフォルダ名）
    pub fn workspace_name(&self) -> &str {
        &self.workspace_name
    }

    pub fn outcome(&self) -> &DeploymentOutcome {
        &self.outcome
    }

    pub fn success(&self) -> bool {
        matches!(self.outcome, DeploymentOutcome::Succeeded)
    }

    /// 失敗時のエラーメッセージ。成功時は空文字列
    pub fn error_message(&self) -> &str {
        match &self.outcome {
            DeploymentOutcome::Succeeded => "",
            DeploymentOutcome::Failed { error } => error,
        }
    }
}

/// 全ワークスペースのデプロイ結果
///
/// 件数は結果リストから都度計算する。
#[derive(Debug, Clone)]
pub struct DeploymentSummary {
    environment: Environment,
    duration: Duration,
    results: Vec<DeploymentResult>,
}

impl DeploymentSummary {
    pub fn new(environment: Environment, duration: Duration, results: Vec<DeploymentResult>) -> Self {
        Self {
            environment,
            duration,
            results,
        }
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// 経過時間（秒）
    pub fn duration_secs(&self) -> f64 {
        self.duration.as_secs_f64()
    }

    /// デプロイ順の結果
    pub fn results(&self) -> &[DeploymentResult] {
        &self.results
    }

    pub fn total_workspaces(&self) -> usize {
        self.results.len()
    }

    pub fn successful_count(&self) -> usize {
        self.results.iter().filter(|r| r.success()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| !r.success()).count()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed_count() == 0
    }
}
