//! Configuration management and credential loading

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Error;
use crate::Result;

/// Environment variable holding the Gemini API key.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Gemini API key, read from the environment (never from the config file)
    #[serde(skip)]
    pub api_key: String,

    /// Model to use
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the OpenAI-compatible chat completions endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Telegram configuration
    #[serde(default)]
    pub telegram: TelegramConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub token: String,

    #[serde(default)]
    pub allow_from: Vec<String>,
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/openai/".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            base_url: default_base_url(),
            telegram: TelegramConfig::default(),
        }
    }
}

/// Get the config directory path
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".lingo")
}

/// Get the config file path
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// Load settings only, without requiring the API key.
///
/// Reads the optional `~/.lingo/config.json`; defaults apply when it does
/// not exist.
pub fn load_settings() -> Result<Config> {
    load_file(&config_path())
}

/// Load configuration.
///
/// Reads settings, then requires `GEMINI_API_KEY` from the process
/// environment. A `.env` file in the working directory is honored before the
/// lookup.
pub fn load() -> Result<Config> {
    let _ = dotenvy::dotenv();

    let mut config = load_settings()?;
    config.api_key = require_api_key(std::env::var(API_KEY_VAR).ok())?;
    Ok(config)
}

fn load_file(path: &PathBuf) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}

/// Validate the API key read from the environment.
///
/// The key is a startup precondition: absent or empty means the process
/// never reaches a servable state.
fn require_api_key(value: Option<String>) -> Result<String> {
    match value {
        Some(key) if !key.is_empty() => Ok(key),
        _ => Err(Error::Config(format!(
            "{API_KEY_VAR} is not set. Please ensure it is defined in your .env file."
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(
            config.base_url,
            "https://generativelanguage.googleapis.com/v1beta/openai/"
        );
        assert!(!config.telegram.enabled);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.model, config.model);
        // The API key never round-trips through the config file.
        assert_eq!(parsed.api_key, "");
    }

    #[test]
    fn test_require_api_key_missing() {
        let err = require_api_key(None).unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY is not set"));
    }

    #[test]
    fn test_require_api_key_empty() {
        assert!(require_api_key(Some(String::new())).is_err());
    }

    #[test]
    fn test_require_api_key_present() {
        let key = require_api_key(Some("abc123".to_string())).unwrap();
        assert_eq!(key, "abc123");
    }
}
