//! Bot configuration model and loading.
//!
//! Non-secret settings live in `config.toml` under the platform config
//! directory (`~/.config/ttcbot/` on Linux). A missing file is created
//! with defaults so a fresh install starts without manual setup. API keys
//! never live here; see [`crate::secret`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BotError, Result};

/// Root configuration for the bot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Locale passed to the transit API (`ka` for Georgian).
    pub locale: String,
    /// Base URL of the transit gateway.
    pub transit_base_url: String,
    /// URL of the passenger statistics endpoint.
    pub stats_url: String,
    /// Seconds of inactivity before a browser disables its controls.
    pub browser_idle_secs: u64,
    /// Default LLM model used for chat sessions.
    pub llm_model: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            locale: "ka".to_string(),
            transit_base_url: "https://transit.ttc.com.ge/pis-gateway/api".to_string(),
            stats_url: "https://ttc.com.ge/api/passengers".to_string(),
            browser_idle_secs: 60,
            llm_model: "gemini-2.0-flash".to_string(),
        }
    }
}

impl BotConfig {
    /// Loads the configuration from `path`, writing defaults first when the
    /// file does not exist yet.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save(path)?;
            return Ok(config);
        }

        let raw = std::fs::read_to_string(path)?;
        let config = toml::from_str(&raw)?;
        Ok(config)
    }

    /// Serializes the configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)
            .map_err(|e| BotError::Serialization {
                format: "TOML".to_string(),
                message: e.to_string(),
            })?;
        std::fs::write(path, raw)?;
        Ok(())
    }

    /// Default location of `config.toml` for this platform.
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::config_dir()
            .ok_or_else(|| BotError::config("cannot determine config directory"))?;
        Ok(base.join("ttcbot").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_creates_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = BotConfig::load_or_create(&path).unwrap();
        assert_eq!(config, BotConfig::default());
        assert!(path.exists(), "defaults must be written back");
    }

    #[test]
    fn round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = BotConfig::default();
        config.locale = "en".to_string();
        config.browser_idle_secs = 30;
        config.save(&path).unwrap();

        let loaded = BotConfig::load_or_create(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "locale = \"en\"\n").unwrap();

        let config = BotConfig::load_or_create(&path).unwrap();
        assert_eq!(config.locale, "en");
        assert_eq!(config.browser_idle_secs, 60);
    }
}
