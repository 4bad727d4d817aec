use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Workspaces directory not found: {}", .0.display())]
    WorkspacesDirNotFound(PathBuf),

    #[error("{file} not found in {folder}")]
    ConfigNotFound { folder: String, file: &'static str },

    #[error(
        "No workspace folders with '{file}' found in {}. Each workspace folder must contain a {file} file.",
        .dir.display()
    )]
    NoWorkspaces { dir: PathBuf, file: &'static str },

    #[error("Invalid environment '{given}'. Must be one of: {expected}")]
    InvalidEnvironment { given: String, expected: String },

    #[error("Invalid YAML in {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error(
        "Workspace name for environment '{environment}' not found in {file}. Expected: core.workspace.{environment}"
    )]
    WorkspaceNameNotFound {
        environment: String,
        file: &'static str,
    },

    /// デプロイSDKが返したエラー（メッセージはそのまま保持する）
    #[error("{0}")]
    Deployment(String),

    #[error("Failed to scan {}: {message}", .path.display())]
    DiscoveryError { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// エラーの分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Parse,
    Lookup,
    Deployment,
    Io,
}

impl DeployError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DeployError::WorkspacesDirNotFound(_) | DeployError::ConfigNotFound { .. } => {
                ErrorKind::NotFound
            }
            DeployError::NoWorkspaces { .. } | DeployError::InvalidEnvironment { .. } => {
                ErrorKind::Validation
            }
            DeployError::ConfigParse { .. } => ErrorKind::Parse,
            DeployError::WorkspaceNameNotFound { .. } => ErrorKind::Lookup,
            DeployError::Deployment(_) => ErrorKind::Deployment,
            DeployError::DiscoveryError { .. } | DeployError::Io(_) => ErrorKind::Io,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::NotFound => "not found",
            ErrorKind::Validation => "validation",
            ErrorKind::Parse => "parse",
            ErrorKind::Lookup => "lookup",
            ErrorKind::Deployment => "deployment",
            ErrorKind::Io => "io",
        };
        f.write_str(label)
    }
}

pub type Result<T> = std::result::Result<T, DeployError>;
