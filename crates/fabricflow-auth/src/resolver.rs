//! Credential resolution from the process environment

use crate::credential::{ClientSecretCredential, Credential, DefaultCredential};
use crate::error::{AuthError, Result};
use fabricflow_core::{ENV_GITHUB_ACTIONS, flag_enabled};
use tracing::info;

pub const ENV_AZURE_CLIENT_ID: &str = "AZURE_CLIENT_ID";
pub const ENV_AZURE_TENANT_ID: &str = "AZURE_TENANT_ID";
pub const ENV_AZURE_CLIENT_SECRET: &str = "AZURE_CLIENT_SECRET";

/// Resolve the credential from the process environment
pub fn resolve_credential() -> Result<Credential> {
    resolve_credential_with(|name| std::env::var(name).ok())
}

/// Resolve the credential using `lookup` for environment variables
///
/// 1. All three Service Principal variables set: [`Credential::ServicePrincipal`].
/// 2. Running in CI, or only some of them set: [`AuthError::MissingCredentials`].
/// 3. Otherwise: [`Credential::Ambient`].
///
/// Empty values count as unset.
pub fn resolve_credential_with<F>(lookup: F) -> Result<Credential>
where
    F: Fn(&str) -> Option<String>,
{
    let read = |name: &str| lookup(name).filter(|value| !value.is_empty());

    let client_id = read(ENV_AZURE_CLIENT_ID);
    let tenant_id = read(ENV_AZURE_TENANT_ID);
    let client_secret = read(ENV_AZURE_CLIENT_SECRET);

    let missing: Vec<&'static str> = [
        (ENV_AZURE_CLIENT_ID, client_id.is_some()),
        (ENV_AZURE_TENANT_ID, tenant_id.is_some()),
        (ENV_AZURE_CLIENT_SECRET, client_secret.is_some()),
    ]
    .into_iter()
    .filter(|(_, present)| !present)
    .map(|(name, _)| name)
    .collect();

    if let (Some(client_id), Some(tenant_id), Some(client_secret)) =
        (client_id, tenant_id, client_secret)
    {
        info!(tenant_id = %tenant_id, client_id = %client_id, "Using ClientSecretCredential");
        return Ok(Credential::ServicePrincipal(ClientSecretCredential::new(
            tenant_id,
            client_id,
            client_secret,
        )));
    }

    let partial = missing.len() < 3;
    let is_ci = flag_enabled(lookup(ENV_GITHUB_ACTIONS).as_deref());

    if is_ci || partial {
        let hint = if partial {
            format!(
                "The following secrets are set but incomplete; missing: {}. All three must be configured together.",
                missing.join(", ")
            )
        } else {
            format!(
                "None of the required secrets are configured: {}, {}, {}.",
                ENV_AZURE_CLIENT_ID, ENV_AZURE_TENANT_ID, ENV_AZURE_CLIENT_SECRET
            )
        };
        return Err(AuthError::MissingCredentials { hint, missing });
    }

    info!("Using DefaultCredential (local development)");
    Ok(Credential::Ambient(DefaultCredential::new()))
}
