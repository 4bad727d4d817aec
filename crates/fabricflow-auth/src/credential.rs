//! Credential variants and token acquisition

use crate::error::{AuthError, Result};
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;
use std::fmt;
use std::process::Stdio;
use tokio::process::Command;

/// OAuth scope of the Microsoft Fabric REST API
pub const FABRIC_SCOPE: &str = "https://api.fabric.microsoft.com/.default";

const AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

/// Produces bearer tokens on demand
#[async_trait]
pub trait TokenCredential: Send + Sync {
    async fn get_token(&self, scope: &str) -> Result<AccessToken>;
}

/// Bearer token with its expiry, if known
#[derive(Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_on: Option<DateTime<Utc>>,
}

impl AccessToken {
    pub fn new(token: impl Into<String>, expires_on: Option<DateTime<Utc>>) -> Self {
        Self {
            token: token.into(),
            expires_on,
        }
    }

    /// Expiry as a unix timestamp
    pub fn expires_on_timestamp(&self) -> Option<i64> {
        self.expires_on.map(|t| t.timestamp())
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"<redacted>")
            .field("expires_on", &self.expires_on)
            .finish()
    }
}

/// Service Principal credential (client-credentials grant)
pub struct ClientSecretCredential {
    client: reqwest::Client,
    authority_host: String,
    tenant_id: String,
    client_id: String,
    client_secret: String,
}

impl ClientSecretCredential {
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            authority_host: AUTHORITY_HOST.to_string(),
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Use a different authority (sovereign clouds)
    pub fn with_authority_host(mut self, authority_host: impl Into<String>) -> Self {
        self.authority_host = authority_host.into();
        self
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority_host.trim_end_matches('/'),
            self.tenant_id
        )
    }
}

impl fmt::Debug for ClientSecretCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSecretCredential")
            .field("authority_host", &self.authority_host)
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

#[async_trait]
impl TokenCredential for ClientSecretCredential {
    async fn get_token(&self, scope: &str) -> Result<AccessToken> {
        let url = self.token_url();
        tracing::debug!(url = %url, client_id = %self.client_id, "Requesting client-credentials token");

        let response = self
            .client
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("scope", scope),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            let message = serde_json::from_str::<TokenErrorResponse>(&body)
                .map(|e| e.error_description.unwrap_or(e.error))
                .unwrap_or_else(|_| format!("{} {}", status, body.trim()));
            return Err(AuthError::TokenRequest(message));
        }

        let token: TokenResponse = response.json().await?;
        let expires_on = token
            .expires_in
            .and_then(TimeDelta::try_seconds)
            .map(|lifetime| Utc::now() + lifetime);

        Ok(AccessToken::new(token.access_token, expires_on))
    }
}

/// Ambient credential backed by the locally signed-in Azure CLI
#[derive(Debug, Clone)]
pub struct DefaultCredential {
    az_command: String,
}

impl DefaultCredential {
    pub fn new() -> Self {
        Self {
            az_command: "az".to_string(),
        }
    }

    /// Use a specific `az` executable
    pub fn with_command(az_command: impl Into<String>) -> Self {
        Self {
            az_command: az_command.into(),
        }
    }
}

impl Default for DefaultCredential {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct AzCliToken {
    #[serde(rename = "accessToken")]
    access_token: String,
    #[serde(default)]
    expires_on: Option<i64>,
}

#[async_trait]
impl TokenCredential for DefaultCredential {
    async fn get_token(&self, scope: &str) -> Result<AccessToken> {
        let args = ["account", "get-access-token", "--scope", scope, "--output", "json"];
        tracing::debug!("Running: {} {}", self.az_command, args.join(" "));

        let output = Command::new(&self.az_command)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => AuthError::AzureCliNotFound,
                _ => AuthError::Io(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AuthError::TokenRequest(stderr.trim().to_string()));
        }

        let token: AzCliToken = serde_json::from_slice(&output.stdout)?;
        let expires_on = token
            .expires_on
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0));

        Ok(AccessToken::new(token.access_token, expires_on))
    }
}

/// Which credential strategy was selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    ServicePrincipal,
    Ambient,
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialKind::ServicePrincipal => f.write_str("ClientSecretCredential"),
            CredentialKind::Ambient => f.write_str("DefaultCredential"),
        }
    }
}

/// Credential passed to the deployment call
#[derive(Debug)]
pub enum Credential {
    ServicePrincipal(ClientSecretCredential),
    Ambient(DefaultCredential),
}

impl Credential {
    pub fn kind(&self) -> CredentialKind {
        match self {
            Credential::ServicePrincipal(_) => CredentialKind::ServicePrincipal,
            Credential::Ambient(_) => CredentialKind::Ambient,
        }
    }
}

#[async_trait]
impl TokenCredential for Credential {
    async fn get_token(&self, scope: &str) -> Result<AccessToken> {
        match self {
            Credential::ServicePrincipal(credential) => credential.get_token(scope).await,
            Credential::Ambient(credential) => credential.get_token(scope).await,
        }
    }
}
