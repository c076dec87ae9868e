//! Model client: one prompt in, one raw text reply out.

use std::sync::Arc;
use scriptorium_config::AppConfig;
use scriptorium_core::error::ProviderError;
use scriptorium_core::provider::{Provider, ProviderRequest};
use tracing::debug;

/// Thin wrapper that binds a provider to the configured model settings.
#[derive(Clone)]
pub struct ModelClient {
    /// The LLM provider to use
    provider: Arc<dyn Provider>,

    /// The model to use
    model: String,

    /// Temperature for generation and expansion
    temperature: f32,

    /// Temperature for rewrites
    creative_temperature: f32,

    /// Default max tokens per response
    max_tokens: Option<u32>,

    /// Language the essay is written in
    language: String,
}

impl ModelClient {
    /// Create a client with default sampling settings.
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            creative_temperature: 0.9,
            max_tokens: None,
            language: "English".into(),
        }
    }

    /// Create a client from the loaded configuration.
    pub fn from_config(provider: Arc<dyn Provider>, config: &AppConfig) -> Self {
        Self {
            provider,
            model: config.model.clone(),
            temperature: config.temperature,
            creative_temperature: config.creative_temperature,
            max_tokens: config.max_tokens,
            language: config.language.clone(),
        }
    }

    pub fn with_temperatures(mut self, temperature: f32, creative_temperature: f32) -> Self {
        self.temperature = temperature;
        self.creative_temperature = creative_temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Send a prompt at the standard temperature.
    ///
    /// Fails with [`ProviderError::NotConfigured`] before any network call
    /// when the provider has no usable credential.
    pub async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        self.send(prompt, self.temperature).await
    }

    /// Send a prompt at the creative temperature.
    pub async fn generate_creative(&self, prompt: &str) -> Result<String, ProviderError> {
        self.send(prompt, self.creative_temperature).await
    }

    async fn send(&self, prompt: &str, temperature: f32) -> Result<String, ProviderError> {
        if !self.provider.has_credentials() {
            return Err(ProviderError::NotConfigured(format!(
                "no API key configured for provider '{}'",
                self.provider.name()
            )));
        }

        let mut request = ProviderRequest::new(&self.model, prompt);
        request.temperature = temperature;
        request.max_tokens = self.max_tokens;

        debug!(
            provider = %self.provider.name(),
            model = %self.model,
            temperature,
            prompt_chars = prompt.chars().count(),
            "Calling model"
        );

        let response = self.provider.complete(request).await?;

        if let Some(usage) = &response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Model replied"
            );
        }

        Ok(response.text)
    }
}

impl std::fmt::Debug for ModelClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelClient")
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("creative_temperature", &self.creative_temperature)
            .field("max_tokens", &self.max_tokens)
            .field("language", &self.language)
            .finish()
    }
}
