//! Model provider implementations.
//!
//! Contains the OpenAI-compatible implementation of the [`LlmProvider`]
//! trait defined in `personachat-core`, a provider factory
//! ([`create_provider`]) that builds it from an [`AppConfig`], and a
//! connection test ([`test_provider_connection`]).
//!
//! [`LlmProvider`]: personachat_core::llm::provider::LlmProvider

pub mod openai_compat;

use secrecy::SecretString;

use personachat_core::llm::box_provider::BoxLlmProvider;
use personachat_types::config::AppConfig;
use personachat_types::llm::{CompletionRequest, LlmError};

use self::openai_compat::OpenAiCompatibleProvider;
use self::openai_compat::config::OpenAiCompatConfig;

/// Create a [`BoxLlmProvider`] from the app configuration and a resolved key.
///
/// A configured `base_url` wins; otherwise the provider name selects a
/// preset. Unknown names fall back to the Gemini endpoint.
pub fn create_provider(config: &AppConfig, api_key: SecretString) -> BoxLlmProvider {
    let provider = match config.base_url.as_deref() {
        Some(base_url) => OpenAiCompatibleProvider::new(OpenAiCompatConfig {
            provider_name: config.provider_name.clone(),
            base_url: base_url.to_string(),
            api_key,
            model: config.model.clone(),
        }),
        None => match config.provider_name.as_str() {
            "openai" => OpenAiCompatibleProvider::openai(api_key, &config.model),
            "gemini" => OpenAiCompatibleProvider::gemini(api_key, &config.model),
            other => {
                tracing::warn!(provider = other, "unknown provider, using the gemini endpoint");
                OpenAiCompatibleProvider::gemini(api_key, &config.model)
            }
        },
    };

    BoxLlmProvider::new(provider.with_max_tokens(config.max_tokens))
}

/// Test provider connectivity by sending a minimal request.
///
/// Verifies the API key and endpoint are working.
pub async fn test_provider_connection(provider: &BoxLlmProvider) -> Result<(), LlmError> {
    let mut request = CompletionRequest::open("Reply with one word.", Vec::new())
        .send("Hello")
        .with_temperature(0.0);
    request.max_tokens = Some(10);
    provider.complete(request).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_provider_default_is_gemini() {
        let provider = create_provider(&AppConfig::default(), SecretString::from("k"));
        assert_eq!(provider.name(), "gemini");
        assert_eq!(provider.model(), "gemini-2.0-flash");
    }

    #[test]
    fn test_create_provider_openai_by_name() {
        let config = AppConfig {
            provider_name: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            ..Default::default()
        };
        let provider = create_provider(&config, SecretString::from("k"));
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.model(), "gpt-4o-mini");
    }

    #[test]
    fn test_create_provider_with_base_url() {
        let config = AppConfig {
            provider_name: "local".to_string(),
            base_url: Some("http://localhost:11434/v1".to_string()),
            model: "llama3".to_string(),
            ..Default::default()
        };
        let provider = create_provider(&config, SecretString::from("k"));
        assert_eq!(provider.name(), "local");
    }

    #[test]
    fn test_create_provider_unknown_name_falls_back() {
        let config = AppConfig {
            provider_name: "mystery".to_string(),
            ..Default::default()
        };
        let provider = create_provider(&config, SecretString::from("k"));
        assert_eq!(provider.name(), "gemini");
    }
}
