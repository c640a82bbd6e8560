//! Configuration types for PersonaChat.
//!
//! `AppConfig` represents the `config.toml` in the data directory that
//! selects the model service and the origin used for share links.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
///
/// Loaded from `~/.personachat/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Provider preset name ("gemini" or "openai").
    #[serde(default = "default_provider_name")]
    pub provider_name: String,

    /// Model identifier sent with every request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Optional cap on reply length.
    #[serde(default)]
    pub max_tokens: Option<u32>,

    /// Override the provider's default base URL.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Environment variable that holds the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Origin prepended to share links.
    #[serde(default = "default_share_base_url")]
    pub share_base_url: String,
}

fn default_provider_name() -> String {
    "gemini".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_share_base_url() -> String {
    "http://localhost:3000".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider_name: default_provider_name(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: None,
            base_url: None,
            api_key_env: default_api_key_env(),
            share_base_url: default_share_base_url(),
        }
    }
}
