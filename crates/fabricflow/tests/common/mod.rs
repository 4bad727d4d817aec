use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// ワークスペースフォルダ群を持つ一時ディレクトリ
pub struct TestWorkspaces {
    pub root: TempDir,
}

impl TestWorkspaces {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("workspaces")).unwrap();
        fs::create_dir(root.path().join("bin")).unwrap();
        Self { root }
    }

    /// `workspaces/<folder>/config.yml` を書き込む
    pub fn write_config(&self, folder: &str, content: &str) {
        let dir = self.workspaces_dir().join(folder);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.yml"), content).unwrap();
    }

    /// dev 環境のワークスペース名 `[D] <folder>` を持つ設定
    pub fn add_dev_workspace(&self, folder: &str) {
        self.write_config(
            folder,
            &format!("core:\n  workspace:\n    dev: \"[D] {}\"\n", folder),
        );
    }

    #[allow(dead_code)]
    pub fn add_folder_without_config(&self, folder: &str) {
        fs::create_dir_all(self.workspaces_dir().join(folder)).unwrap();
    }

    /// 作業ディレクトリ（結果JSONの出力先）
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// 実行ファイルを何も含まない `PATH` 用ディレクトリ
    pub fn empty_bin_dir(&self) -> PathBuf {
        self.root.path().join("bin")
    }

    pub fn workspaces_dir(&self) -> PathBuf {
        self.root.path().join("workspaces")
    }

    #[allow(dead_code)]
    pub fn results(&self) -> serde_json::Value {
        let content = fs::read_to_string(self.path().join("deployment-results.json")).unwrap();
        serde_json::from_str(&content).unwrap()
    }
}
