//! Wizard configuration.

use intake_backend_client::IntakeClient;

/// Runtime configuration for the wizard core.
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    /// Base URL of the intake backend.
    pub base_url: String,
}

impl IntakeConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Read configuration from the environment. `INTAKE_API_BASE_URL`
    /// overrides the compiled-in production backend.
    pub fn from_env() -> Self {
        let base_url = std::env::var(IntakeClient::BASE_URL_ENV)
            .unwrap_or_else(|_| IntakeClient::DEFAULT_BASE_URL.to_string());
        Self { base_url }
    }
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
