//! Google Gemini provider implementation.
//!
//! Talks to the `generateContent` REST endpoint of the Generative Language
//! API. One prompt in, the concatenated text parts of the first candidate out.

use async_trait::async_trait;
use scriptorium_core::error::ProviderError;
use scriptorium_core::provider::*;
use serde::Deserialize;
use tracing::{debug, warn};

/// Default Generative Language API root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// A Gemini provider.
pub struct GeminiProvider {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Create a provider against the public endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    /// Create a provider against a custom endpoint (proxies, tests).
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(180))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        }
    }

    fn endpoint(&self, model: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    /// Build the JSON body for a request.
    fn request_body(request: &ProviderRequest) -> serde_json::Value {
        let mut generation_config = serde_json::json!({
            "temperature": request.temperature,
        });
        if let Some(max_tokens) = request.max_tokens {
            generation_config["maxOutputTokens"] = serde_json::json!(max_tokens);
        }

        serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt }],
            }],
            "generationConfig": generation_config,
        })
    }

    /// Map a non-200 status to the matching provider error.
    fn status_error(status: u16, body: String) -> ProviderError {
        match status {
            429 => ProviderError::RateLimited {
                retry_after_secs: 30,
            },
            401 | 403 => ProviderError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ),
            _ => ProviderError::ApiError {
                status_code: status,
                message: body,
            },
        }
    }

    /// Pull the reply text out of a decoded response.
    fn into_response(api: ApiResponse, requested_model: &str) -> Result<ProviderResponse, ProviderError> {
        if let Some(reason) = api.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(ProviderError::EmptyResponse(format!("prompt blocked: {reason}")));
        }

        let candidate = api
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::EmptyResponse("no candidates in response".into()))?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".into());
            return Err(ProviderError::EmptyResponse(format!(
                "candidate has no text (finish reason: {reason})"
            )));
        }

        let usage = api.usage_metadata.map(|u| Usage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        });

        Ok(ProviderResponse {
            text,
            usage,
            model: api.model_version.unwrap_or_else(|| requested_model.to_string()),
        })
    }
}

#[async_trait]
impl scriptorium_core::Provider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn has_credentials(&self) -> bool {
        scriptorium_config::is_usable_key(&self.api_key)
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        let url = self.endpoint(&request.model);
        let body = Self::request_body(&request);

        debug!(provider = "gemini", model = %request.model, prompt_chars = request.prompt.len(), "Sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Gemini returned error");
            return Err(Self::status_error(status, error_body));
        }

        let api_response: ApiResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                status_code: 200,
                message: format!("Failed to parse response: {e}"),
            })?;

        Self::into_response(api_response, &request.model)
    }

    async fn list_models(&self) -> std::result::Result<Vec<String>, ProviderError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Ok(Vec::new());
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(model_names(&body))
    }

    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(response.status().is_success())
    }
}

fn model_names(body: &serde_json::Value) -> Vec<String> {
    body["models"]
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|m| m["name"].as_str())
                .map(|n| n.trim_start_matches("models/").to_string())
                .collect()
        })
        .unwrap_or_default()
}

// --- Gemini API types (internal) ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<ApiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<ApiPromptFeedback>,
    #[serde(default)]
    usage_metadata: Option<ApiUsage>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiCandidate {
    #[serde(default)]
    content: Option<ApiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiContent {
    #[serde(default)]
    parts: Vec<ApiPart>,
}

#[derive(Debug, Deserialize)]
struct ApiPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptorium_core::Provider;

    #[test]
    fn endpoint_strips_models_prefix() {
        let provider = GeminiProvider::new("AIza-test");
        assert_eq!(
            provider.endpoint("models/gemini-2.5-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(provider.endpoint("gemini-2.5-flash"), provider.endpoint("models/gemini-2.5-flash"));
    }

    #[test]
    fn custom_base_url_trailing_slash() {
        let provider = GeminiProvider::with_base_url("http://localhost:9000/v1beta/", "k");
        assert!(provider.endpoint("m").starts_with("http://localhost:9000/v1beta/models/m"));
    }

    #[test]
    fn placeholder_key_has_no_credentials() {
        assert!(!GeminiProvider::new("").has_credentials());
        assert!(!GeminiProvider::new("SUA_CHAVE_API_AQUI").has_credentials());
        assert!(GeminiProvider::new("AIza-real").has_credentials());
    }

    #[test]
    fn request_body_shape() {
        let mut req = ProviderRequest::new("gemini-2.5-flash", "Write a title");
        req.max_tokens = Some(2048);
        let body = GeminiProvider::request_body(&req);
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Write a title");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 2048);
        assert!(body["generationConfig"]["temperature"].is_number());
    }

    #[test]
    fn request_body_omits_unset_max_tokens() {
        let body = GeminiProvider::request_body(&ProviderRequest::new("m", "p"));
        assert!(body["generationConfig"].get("maxOutputTokens").is_none());
    }

    #[test]
    fn parse_successful_response() {
        let data = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Carbon Pricing "}, {"text": "and Policy"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 6, "totalTokenCount": 18},
            "modelVersion": "gemini-2.5-flash-001"
        }"#;
        let api: ApiResponse = serde_json::from_str(data).unwrap();
        let resp = GeminiProvider::into_response(api, "gemini-2.5-flash").unwrap();
        assert_eq!(resp.text, "Carbon Pricing and Policy");
        assert_eq!(resp.model, "gemini-2.5-flash-001");
        assert_eq!(resp.usage.unwrap().total_tokens, 18);
    }

    #[test]
    fn blocked_prompt_is_empty_response() {
        let data = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let api: ApiResponse = serde_json::from_str(data).unwrap();
        let err = GeminiProvider::into_response(api, "m").unwrap_err();
        assert!(matches!(err, ProviderError::EmptyResponse(ref m) if m.contains("SAFETY")));
    }

    #[test]
    fn candidate_without_text_is_error() {
        let data = r#"{"candidates": [{"finishReason": "MAX_TOKENS"}]}"#;
        let api: ApiResponse = serde_json::from_str(data).unwrap();
        let err = GeminiProvider::into_response(api, "m").unwrap_err();
        assert!(err.to_string().contains("MAX_TOKENS"));
    }

    #[test]
    fn no_candidates_is_error() {
        let api: ApiResponse = serde_json::from_str("{}").unwrap();
        assert!(GeminiProvider::into_response(api, "m").is_err());
    }

    #[test]
    fn model_listing_strips_prefix() {
        let body = serde_json::json!({
            "models": [{"name": "models/gemini-2.5-flash"}, {"name": "models/gemini-2.5-pro"}]
        });
        assert_eq!(model_names(&body), vec!["gemini-2.5-flash", "gemini-2.5-pro"]);
    }

    #[test]
    fn status_codes_map_to_errors() {
        assert!(matches!(
            GeminiProvider::status_error(429, String::new()),
            ProviderError::RateLimited { retry_after_secs: 30 }
        ));
        assert!(matches!(
            GeminiProvider::status_error(401, String::new()),
            ProviderError::AuthenticationFailed(_)
        ));
        assert!(matches!(
            GeminiProvider::status_error(403, String::new()),
            ProviderError::AuthenticationFailed(_)
        ));
        match GeminiProvider::status_error(500, "backend exploded".into()) {
            ProviderError::ApiError { status_code, message } => {
                assert_eq!(status_code, 500);
                assert_eq!(message, "backend exploded");
            }
            other => panic!("expected ApiError, got {other:?}"),
        }
        assert!(matches!(
            GeminiProvider::status_error(400, String::new()),
            ProviderError::ApiError { status_code: 400, .. }
        ));
    }
}
