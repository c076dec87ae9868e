//! Provider selection — builds the configured LLM provider.

use std::sync::Arc;
use scriptorium_config::AppConfig;
use scriptorium_core::provider::Provider;
use crate::gemini::{self, GeminiProvider};
use crate::openai_compat::OpenAiCompatProvider;

/// Build the provider named by `config.provider`.
///
/// A missing key still yields a provider; it reports `has_credentials() ==
/// false` and the model client refuses to call it.
pub fn build_from_config(config: &AppConfig) -> Arc<dyn Provider> {
    let name = config.provider.as_str();
    let provider_config = config.providers.get(name);

    let api_key = config.resolved_api_key().unwrap_or_default();
    let base_url = provider_config
        .and_then(|p| p.api_url.clone())
        .unwrap_or_else(|| default_base_url(name));

    tracing::debug!(provider = name, base_url = %base_url, "Building provider");

    if name == "gemini" {
        Arc::new(GeminiProvider::with_base_url(base_url, api_key))
    } else {
        Arc::new(OpenAiCompatProvider::new(name, base_url, api_key))
    }
}

/// Get the default base URL for well-known providers.
fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "gemini" => gemini::DEFAULT_BASE_URL.into(),
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "openai" => "https://api.openai.com/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        "deepseek" => "https://api.deepseek.com/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        "together" => "https://api.together.xyz/v1".into(),
        "vllm" => "http://localhost:8000/v1".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptorium_config::ProviderConfig;

    #[test]
    fn default_base_urls() {
        assert!(default_base_url("gemini").contains("generativelanguage.googleapis.com"));
        assert!(default_base_url("openai").contains("api.openai.com"));
        assert!(default_base_url("ollama").contains("localhost:11434"));
    }

    #[test]
    fn build_from_default_config() {
        let config = AppConfig::default();
        let provider = build_from_config(&config);
        assert_eq!(provider.name(), "gemini");
        assert!(!provider.has_credentials());
    }

    #[test]
    fn build_openai_compatible_with_key() {
        let mut config = AppConfig {
            provider: "openrouter".into(),
            ..AppConfig::default()
        };
        config.providers.insert(
            "openrouter".into(),
            ProviderConfig {
                api_key: Some("sk-or-test".into()),
                api_url: None,
            },
        );
        let provider = build_from_config(&config);
        assert_eq!(provider.name(), "openrouter");
        assert!(provider.has_credentials());
    }
}
