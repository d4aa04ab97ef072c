//! File-backed secret loading with environment fallback.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;
use ttcbot_core::secret::{SecretConfig, SecretService};
use ttcbot_core::{BotError, Result};

const TRANSIT_KEY_ENV: &str = "TRANSIT_API_KEY";
const GEMINI_KEY_ENV: &str = "GEMINI_API_KEY";

/// Reads secrets from `secret.json` next to the bot config, filling any
/// missing key from the environment.
pub struct FileSecretService {
    path: PathBuf,
}

impl FileSecretService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.config/ttcbot/secret.json` on Linux.
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::config_dir()
            .ok_or_else(|| BotError::config("could not determine the user config directory"))?;
        Ok(base.join("ttcbot").join("secret.json"))
    }

    fn load_file(path: &Path) -> Result<SecretConfig> {
        let content = std::fs::read_to_string(path)?;
        let secrets: SecretConfig = serde_json::from_str(&content)?;
        Ok(secrets)
    }
}

#[async_trait]
impl SecretService for FileSecretService {
    async fn load_secrets(&self) -> Result<SecretConfig> {
        let mut secrets = if self.path.exists() {
            Self::load_file(&self.path)?
        } else {
            debug!(path = %self.path.display(), "no secret file, relying on environment");
            SecretConfig::default()
        };

        if secrets.transit_api_key.is_none() {
            secrets.transit_api_key = std::env::var(TRANSIT_KEY_ENV).ok();
        }
        if secrets.gemini_api_key.is_none() {
            secrets.gemini_api_key = std::env::var(GEMINI_KEY_ENV).ok();
        }

        Ok(secrets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_keys_from_the_secret_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.json");
        std::fs::write(
            &path,
            r#"{"transit_api_key": "tk-1", "gemini_api_key": "gk-1"}"#,
        )
        .unwrap();

        let secrets = FileSecretService::new(&path).load_secrets().await.unwrap();
        assert_eq!(secrets.transit_api_key.as_deref(), Some("tk-1"));
        assert_eq!(secrets.gemini_api_key.as_deref(), Some("gk-1"));
    }

    #[tokio::test]
    async fn partial_file_leaves_missing_keys_unset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.json");
        std::fs::write(&path, r#"{"transit_api_key": "tk-2"}"#).unwrap();

        let secrets = FileSecretService::new(&path).load_secrets().await.unwrap();
        assert_eq!(secrets.transit_api_key.as_deref(), Some("tk-2"));
        // May be filled from the environment on a developer machine, but
        // never from the file.
        if std::env::var(GEMINI_KEY_ENV).is_err() {
            assert!(secrets.gemini_api_key.is_none());
        }
    }

    #[tokio::test]
    async fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.json");
        std::fs::write(&path, "not json").unwrap();

        let err = FileSecretService::new(&path)
            .load_secrets()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("JSON"));
    }
}
