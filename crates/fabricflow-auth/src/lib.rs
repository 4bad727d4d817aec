//! FabricFlow authentication
//!
//! Decides which credential the deployment uses and acquires access tokens
//! for the Microsoft Fabric REST API.
//!
//! # Credential strategies
//!
//! - **Service Principal**: `AZURE_CLIENT_ID`, `AZURE_TENANT_ID` and
//!   `AZURE_CLIENT_SECRET` are all set. Tokens come from the OAuth2
//!   client-credentials grant.
//! - **Ambient**: nothing is configured and the process is not running in CI.
//!   Tokens come from the locally signed-in Azure CLI (`az login`).
//!
//! Anything in between (partial secrets, or no secrets inside CI) is a
//! configuration error. There is no silent fallback in CI.

pub mod credential;
pub mod error;
pub mod resolver;

// Re-exports
pub use credential::{
    AccessToken, ClientSecretCredential, Credential, CredentialKind, DefaultCredential,
    FABRIC_SCOPE, TokenCredential,
};
pub use error::{AuthError, Result};
pub use resolver::{
    ENV_AZURE_CLIENT_ID, ENV_AZURE_CLIENT_SECRET, ENV_AZURE_TENANT_ID, resolve_credential,
    resolve_credential_with,
};
