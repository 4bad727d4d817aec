//! fabric-cicd bridge
//!
//! Runs the Python `fabric_cicd` package through a small embedded script.
//! The access token is acquired here and handed to the script, so the Python
//! side never sees client secrets.

use crate::backend::{DeployBackend, SdkLogLevel};
use async_trait::async_trait;
use fabricflow_auth::{FABRIC_SCOPE, TokenCredential};
use fabricflow_core::{DeployError, Environment, Result};
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{ChildStderr, Command};

const ENV_CONFIG_FILE: &str = "FABRICFLOW_CONFIG_FILE";
const ENV_ENVIRONMENT: &str = "FABRICFLOW_ENVIRONMENT";
const ENV_FEATURE_FLAGS: &str = "FABRICFLOW_FEATURE_FLAGS";
const ENV_LOG_LEVEL: &str = "FABRICFLOW_LOG_LEVEL";
const ENV_ACCESS_TOKEN: &str = "FABRICFLOW_ACCESS_TOKEN";
const ENV_TOKEN_EXPIRES_ON: &str = "FABRICFLOW_TOKEN_EXPIRES_ON";

/// Prefix of the stderr line carrying the JSON-encoded exception message
const ERROR_MARKER: &str = "FABRICFLOW_ERROR ";

/// Bridge script executed with `python -c`
pub const BRIDGE_SCRIPT: &str = r#"
import json
import os
import sys
import time

ERROR_MARKER = "FABRICFLOW_ERROR "


def main():
    from azure.core.credentials import AccessToken
    from fabric_cicd import append_feature_flag, change_log_level, deploy_with_config

    class StaticTokenCredential:
        def __init__(self, token, expires_on):
            self._token = AccessToken(token, expires_on)

        def get_token(self, *scopes, **kwargs):
            return self._token

    for flag in filter(None, os.environ.get("FABRICFLOW_FEATURE_FLAGS", "").split(",")):
        append_feature_flag(flag)

    level = os.environ.get("FABRICFLOW_LOG_LEVEL")
    if level:
        change_log_level(level)

    expires_on = int(os.environ.get("FABRICFLOW_TOKEN_EXPIRES_ON") or time.time() + 3600)
    deploy_with_config(
        config_file_path=os.environ["FABRICFLOW_CONFIG_FILE"],
        environment=os.environ["FABRICFLOW_ENVIRONMENT"],
        token_credential=StaticTokenCredential(os.environ["FABRICFLOW_ACCESS_TOKEN"], expires_on),
    )


try:
    main()
except Exception as exc:
    sys.stderr.write(ERROR_MARKER + json.dumps(str(exc)) + "\n")
    sys.exit(1)
"#;

/// fabric-cicd backend
#[derive(Debug, Clone)]
pub struct FabricCicd {
    python: String,
    feature_flags: Vec<String>,
    log_level: Option<SdkLogLevel>,
}

impl FabricCicd {
    pub fn new(python: impl Into<String>) -> Self {
        Self {
            python: python.into(),
            feature_flags: Vec::new(),
            log_level: None,
        }
    }

    pub fn python(&self) -> &str {
        &self.python
    }

    pub fn feature_flags(&self) -> &[String] {
        &self.feature_flags
    }

    pub fn log_level(&self) -> Option<SdkLogLevel> {
        self.log_level
    }
}

#[async_trait]
impl DeployBackend for FabricCicd {
    fn name(&self) -> &str {
        "fabric-cicd"
    }

    fn append_feature_flag(&mut self, flag: &str) {
        if !self.feature_flags.iter().any(|f| f == flag) {
            self.feature_flags.push(flag.to_string());
        }
    }

    fn change_log_level(&mut self, level: SdkLogLevel) {
        self.log_level = Some(level);
    }

    async fn deploy_with_config(
        &self,
        config_file: &Path,
        environment: Environment,
        credential: &dyn TokenCredential,
    ) -> Result<()> {
        let token = credential
            .get_token(FABRIC_SCOPE)
            .await
            .map_err(|e| DeployError::Deployment(format!("Failed to acquire access token: {}", e)))?;

        let mut cmd = Command::new(&self.python);
        cmd.arg("-c")
            .arg(BRIDGE_SCRIPT)
            .env(ENV_CONFIG_FILE, config_file)
            .env(ENV_ENVIRONMENT, environment.as_str())
            .env(ENV_FEATURE_FLAGS, self.feature_flags.join(","))
            .env(ENV_ACCESS_TOKEN, &token.token)
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped());

        if let Some(level) = self.log_level {
            cmd.env(ENV_LOG_LEVEL, level.as_str());
        }
        if let Some(expires_on) = token.expires_on_timestamp() {
            cmd.env(ENV_TOKEN_EXPIRES_ON, expires_on.to_string());
        }

        tracing::debug!(
            python = %self.python,
            config_file = %config_file.display(),
            environment = %environment,
            feature_flags = ?self.feature_flags,
            "Running fabric-cicd bridge"
        );

        let mut child = cmd.spawn().map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                DeployError::Deployment(format!("Python interpreter '{}' not found", self.python))
            }
            _ => DeployError::Deployment(format!("Failed to run {}: {}", self.python, e)),
        })?;

        let stderr = match child.stderr.take() {
            Some(stderr) => forward_stderr(stderr).await.map_err(|e| {
                DeployError::Deployment(format!("Failed to read {} output: {}", self.name(), e))
            })?,
            None => String::new(),
        };

        let status = child.wait().await.map_err(|e| {
            DeployError::Deployment(format!("Failed to wait for {}: {}", self.python, e))
        })?;

        if !status.success() {
            let message = failure_message(&stderr)
                .unwrap_or_else(|| format!("{} exited with {}", self.name(), status));
            return Err(DeployError::Deployment(message));
        }

        Ok(())
    }
}

/// Echo the child's stderr line by line while it runs, except the marker line
///
/// Returns everything that was read.
async fn forward_stderr(stderr: ChildStderr) -> std::io::Result<String> {
    let mut segments = BufReader::new(stderr).split(b'\n');
    let mut captured = String::new();

    while let Some(segment) = segments.next_segment().await? {
        let line = String::from_utf8_lossy(&segment);
        let line = line.trim_end_matches('\r');
        if !line.starts_with(ERROR_MARKER) {
            eprintln!("{}", line);
        }
        captured.push_str(line);
        captured.push('\n');
    }

    Ok(captured)
}

/// Extract the SDK's error message from the bridge's stderr
///
/// Prefers the marker line written by the bridge; falls back to the last
/// non-empty line (e.g. an import error traceback).
fn failure_message(stderr: &str) -> Option<String> {
    let marked = stderr
        .lines()
        .rev()
        .find_map(|line| line.strip_prefix(ERROR_MARKER))
        .and_then(|encoded| serde_json::from_str::<String>(encoded.trim()).ok());

    marked.or_else(|| {
        stderr
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
    })
}
