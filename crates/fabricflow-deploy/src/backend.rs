//! Deployment SDK abstraction

use async_trait::async_trait;
use fabricflow_auth::TokenCredential;
use fabricflow_core::{Environment, Result};
use std::fmt;
use std::path::Path;

/// Feature flags every run enables for config-based deployment
pub const DEFAULT_FEATURE_FLAGS: [&str; 2] = ["enable_experimental_features", "enable_config_deploy"];

/// Log level of the deployment SDK itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdkLogLevel {
    Info,
    Debug,
}

impl SdkLogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SdkLogLevel::Info => "INFO",
            SdkLogLevel::Debug => "DEBUG",
        }
    }
}

impl fmt::Display for SdkLogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deployment SDK abstraction trait
///
/// Everything that talks to the remote platform (authentication handshake,
/// item upload, dependency resolution) lives behind this trait.
#[async_trait]
pub trait DeployBackend: Send + Sync {
    /// Returns the backend name for logs
    fn name(&self) -> &str;

    /// Enable a named experimental feature of the SDK
    fn append_feature_flag(&mut self, flag: &str);

    /// Adjust the SDK's internal log verbosity
    fn change_log_level(&mut self, level: SdkLogLevel);

    /// Deploy all items described by `config_file` into the workspace
    /// configured for `environment`
    ///
    /// Failures are reported as [`fabricflow_core::DeployError::Deployment`]
    /// carrying the SDK's message.
    async fn deploy_with_config(
        &self,
        config_file: &Path,
        environment: Environment,
        credential: &dyn TokenCredential,
    ) -> Result<()>;
}

/// Enable the default feature flags and, when `sdk_debug` is set, the SDK's
/// debug logging
pub fn configure_backend(backend: &mut dyn DeployBackend, sdk_debug: bool) {
    for flag in DEFAULT_FEATURE_FLAGS {
        backend.append_feature_flag(flag);
    }
    if sdk_debug {
        backend.change_log_level(SdkLogLevel::Debug);
    }
    tracing::debug!(backend = backend.name(), sdk_debug, "Configured deployment backend");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBackend;

    #[test]
    fn test_configure_backend_enables_default_flags() {
        let mut backend = FakeBackend::default();
        configure_backend(&mut backend, false);
        assert_eq!(
            backend.feature_flags,
            ["enable_experimental_features", "enable_config_deploy"]
        );
        assert_eq!(backend.log_level, None);
    }

    #[test]
    fn test_configure_backend_debug() {
        let mut backend = FakeBackend::default();
        configure_backend(&mut backend, true);
        assert_eq!(backend.log_level, Some(SdkLogLevel::Debug));
    }
}
