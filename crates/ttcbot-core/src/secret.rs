//! Secret management.
//!
//! API keys are kept out of `config.toml` and loaded through this trait.
//!
//! # Security Note
//!
//! Implementations should ensure that secrets are never logged and that
//! error messages do not contain key material.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// API keys for the external collaborators.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretConfig {
    /// Key sent as `X-Api-Key` to the transit gateway.
    pub transit_api_key: Option<String>,
    /// Key for the LLM completion API.
    pub gemini_api_key: Option<String>,
}

/// Service for loading secret configuration.
#[async_trait::async_trait]
pub trait SecretService: Send + Sync {
    /// Loads the secret configuration.
    ///
    /// Missing keys are represented as `None`; callers decide which ones
    /// they can work without.
    async fn load_secrets(&self) -> Result<SecretConfig>;
}
