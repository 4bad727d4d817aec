//! Authentication error types

use thiserror::Error;

/// Setup and troubleshooting references appended to credential errors
pub const CREDENTIAL_GUIDANCE: &str = "
  These secrets authenticate the deployment pipeline to Microsoft Fabric
  using a Service Principal (Entra ID App Registration).

  Setup instructions : https://learn.microsoft.com/en-us/entra/identity-platform/howto-create-service-principal-portal
  Troubleshooting    : https://microsoft.github.io/fabric-cicd/latest/
";

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{hint}\n{guidance}", guidance = CREDENTIAL_GUIDANCE)]
    MissingCredentials {
        hint: String,
        missing: Vec<&'static str>,
    },

    #[error("Azure CLI not found. Install it and run `az login`")]
    AzureCliNotFound,

    #[error("Token request failed: {0}")]
    TokenRequest(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AuthError {
    /// Credentials are missing or only partially configured
    pub fn is_configuration(&self) -> bool {
        matches!(self, AuthError::MissingCredentials { .. })
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;
