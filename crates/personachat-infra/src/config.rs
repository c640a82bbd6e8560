//! Configuration loading for PersonaChat.
//!
//! Resolves the data directory, reads `config.toml` from it into
//! [`AppConfig`], and resolves the model service API key from the
//! environment.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use personachat_types::config::AppConfig;
use personachat_types::error::ConfigError;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "PERSONACHAT_DATA_DIR";

const CONFIG_FILE: &str = "config.toml";

/// Resolve the data directory path.
///
/// Priority: `PERSONACHAT_DATA_DIR` env var, then `~/.personachat`, then
/// `./.personachat`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".personachat");
    }

    PathBuf::from(".personachat")
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// A missing file yields [`AppConfig::default()`]; an unreadable or
/// unparsable file is an error.
pub async fn load_config(data_dir: &Path) -> Result<AppConfig, ConfigError> {
    let config_path = data_dir.join(CONFIG_FILE);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(AppConfig::default());
        }
        Err(err) => {
            return Err(ConfigError::Read(format!(
                "{}: {err}",
                config_path.display()
            )));
        }
    };

    toml::from_str::<AppConfig>(&content)
        .map_err(|e| ConfigError::Parse(format!("{}: {e}", config_path.display())))
}

/// Read the API key from the environment variable named by `api_key_env`.
pub fn resolve_api_key(config: &AppConfig) -> Result<SecretString, ConfigError> {
    api_key_from(&config.api_key_env, |name| std::env::var(name).ok())
}

fn api_key_from(
    var_name: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    lookup(var_name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(SecretString::from)
        .ok_or_else(|| ConfigError::MissingApiKey(var_name.to_string()))
}
