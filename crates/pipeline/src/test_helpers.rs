//! Shared test helpers for pipeline tests.

use scriptorium_core::error::ProviderError;
use scriptorium_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use std::sync::Mutex;

/// A mock provider that returns a sequence of scripted replies.
///
/// Each call to `complete` returns the next reply in the queue and records
/// the request. Panics if more calls are made than replies provided.
pub struct ScriptedProvider {
    replies: Vec<Result<String, ProviderError>>,
    requests: Mutex<Vec<ProviderRequest>>,
    credentials: bool,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<&str>) -> Self {
        Self::from_results(replies.into_iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn from_results(replies: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            replies,
            requests: Mutex::new(Vec::new()),
            credentials: true,
        }
    }

    /// A provider whose first call fails.
    pub fn failing(error: ProviderError) -> Self {
        Self::from_results(vec![Err(error)])
    }

    pub fn without_credentials(mut self) -> Self {
        self.credentials = false;
        self
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.prompt).collect()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted_mock"
    }

    fn has_credentials(&self) -> bool {
        self.credentials
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let index = requests.len();
        requests.push(request);

        let reply = self.replies.get(index).unwrap_or_else(|| {
            panic!(
                "ScriptedProvider: no more replies (call #{index}, have {})",
                self.replies.len()
            )
        });

        reply.clone().map(|text| ProviderResponse {
            text,
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model: "mock-model".into(),
        })
    }
}
