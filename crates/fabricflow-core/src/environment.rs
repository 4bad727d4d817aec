//! デプロイ先環境の定義

use crate::error::DeployError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// CI (GitHub Actions) 上で実行されているかを示す環境変数
pub const ENV_GITHUB_ACTIONS: &str = "GITHUB_ACTIONS";

/// デプロイSDKのデバッグログを有効にする環境変数
pub const ENV_ACTIONS_RUNNER_DEBUG: &str = "ACTIONS_RUNNER_DEBUG";

/// デプロイ先環境
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Test,
    Prod,
}

impl Environment {
    pub const ALL: [Environment; 3] = [Environment::Dev, Environment::Test, Environment::Prod];

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Test => "test",
            Environment::Prod => "prod",
        }
    }

    /// ヘッダー表示用の大文字表記
    pub fn upper(&self) -> String {
        self.as_str().to_ascii_uppercase()
    }

    /// 有効な環境名（アルファベット順）
    pub fn names() -> Vec<&'static str> {
        let mut names: Vec<_> = Self::ALL.iter().map(|env| env.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = DeployError;

    /// 大文字小文字を区別せずにパースする
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|env| env.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DeployError::InvalidEnvironment {
                given: s.to_string(),
                expected: Self::names().join(", "),
            })
    }
}

/// `"true"`（大文字小文字を問わない）のときだけ有効とみなす
pub fn flag_enabled(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}
