//! Test doubles shared by the pipeline tests

use crate::backend::{DeployBackend, SdkLogLevel};
use async_trait::async_trait;
use fabricflow_auth::{Credential, DefaultCredential, TokenCredential};
use fabricflow_core::{CONFIG_FILE, DeployError, Environment, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Records every deploy call; fails for the configured workspace folders
#[derive(Default)]
pub struct FakeBackend {
    calls: Mutex<Vec<PathBuf>>,
    failures: HashMap<String, String>,
    pub feature_flags: Vec<String>,
    pub log_level: Option<SdkLogLevel>,
}

impl FakeBackend {
    pub fn failing(folder: &str, message: &str) -> Self {
        Self::default().and_failing(folder, message)
    }

    pub fn and_failing(mut self, folder: &str, message: &str) -> Self {
        self.failures.insert(folder.to_string(), message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }

    /// Workspace folders in call order
    pub fn called_folders(&self) -> Vec<String> {
        self.calls()
            .iter()
            .filter_map(|p| p.parent()?.file_name()?.to_str().map(str::to_string))
            .collect()
    }
}

#[async_trait]
impl DeployBackend for FakeBackend {
    fn name(&self) -> &str {
        "fake"
    }

    fn append_feature_flag(&mut self, flag: &str) {
        self.feature_flags.push(flag.to_string());
    }

    fn change_log_level(&mut self, level: SdkLogLevel) {
        self.log_level = Some(level);
    }

    async fn deploy_with_config(
        &self,
        config_file: &Path,
        _environment: Environment,
        _credential: &dyn TokenCredential,
    ) -> Result<()> {
        self.calls.lock().unwrap().push(config_file.to_path_buf());

        let folder = config_file
            .parent()
            .and_then(Path::file_name)
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        match self.failures.get(folder) {
            Some(message) => Err(DeployError::Deployment(message.clone())),
            None => Ok(()),
        }
    }
}

pub fn write_config(root: &Path, folder: &str, content: &str) {
    let dir = root.join(folder);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(CONFIG_FILE), content).unwrap();
}

/// `config.yml` with `core.workspace.dev: "[D] <folder>"`
pub fn write_dev_workspace(root: &Path, folder: &str) {
    write_config(
        root,
        folder,
        &format!("core:\n  workspace:\n    dev: \"[D] {folder}\"\n"),
    );
}

pub fn ambient() -> Credential {
    Credential::Ambient(DefaultCredential::new())
}
