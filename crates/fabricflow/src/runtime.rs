//! 実行環境の設定
//!
//! プロセス環境変数から一度だけ読み込む。

use fabricflow_core::{ENV_ACTIONS_RUNNER_DEBUG, ENV_GITHUB_ACTIONS, flag_enabled};

/// SDKブリッジを実行するPythonインタプリタ
pub const ENV_FABRIC_CICD_PYTHON: &str = "FABRIC_CICD_PYTHON";
pub const DEFAULT_PYTHON: &str = "python3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// GitHub Actions 上で実行中か
    pub ci: bool,
    /// SDKのログレベルを DEBUG にするか
    pub sdk_debug: bool,
    pub python: String,
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let python = lookup(ENV_FABRIC_CICD_PYTHON)
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_PYTHON.to_string());

        Self {
            ci: flag_enabled(lookup(ENV_GITHUB_ACTIONS).as_deref()),
            sdk_debug: flag_enabled(lookup(ENV_ACTIONS_RUNNER_DEBUG).as_deref()),
            python,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn runtime(vars: &[(&str, &str)]) -> RuntimeConfig {
        let env: HashMap<&str, &str> = vars.iter().copied().collect();
        RuntimeConfig::from_lookup(|name| env.get(name).map(|v| v.to_string()))
    }

    #[test]
    fn test_defaults() {
        let config = runtime(&[]);
        assert!(!config.ci);
        assert!(!config.sdk_debug);
        assert_eq!(config.python, "python3");
    }

    #[test]
    fn test_flags_are_case_insensitive() {
        let config = runtime(&[
            (ENV_GITHUB_ACTIONS, "TRUE"),
            (ENV_ACTIONS_RUNNER_DEBUG, "True"),
        ]);
        assert!(config.ci);
        assert!(config.sdk_debug);
    }

    #[test]
    fn test_only_true_enables_flags() {
        let config = runtime(&[(ENV_GITHUB_ACTIONS, "1"), (ENV_ACTIONS_RUNNER_DEBUG, "yes")]);
        assert!(!config.ci);
        assert!(!config.sdk_debug);
    }

    #[test]
    fn test_python_override() {
        assert_eq!(
            runtime(&[(ENV_FABRIC_CICD_PYTHON, "/opt/venv/bin/python")]).python,
            "/opt/venv/bin/python"
        );
        // 空文字はデフォルト扱い
        assert_eq!(runtime(&[(ENV_FABRIC_CICD_PYTHON, "")]).python, "python3");
    }
}
