//! OpenAI-compatible chat completions client
//!
//! Groq exposes the same `/chat/completions` surface as OpenAI, so a single
//! client serves both; only the endpoint differs.

use super::provider::{ChatMessage, GenerationError, GenerationProvider, GenerationResult};
use crate::routing::ModelProfile;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Blocking client for one chat completions endpoint
#[derive(Debug)]
pub struct ChatCompletionsProvider {
    name: String,
    endpoint: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl ChatCompletionsProvider {
    pub fn new(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        timeout_secs: u64,
    ) -> GenerationResult<Self> {
        let name = name.into();
        let endpoint = endpoint.into();

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| GenerationError::Config(format!("Failed to build HTTP client: {}", e)))?;

        info!("Chat completions provider {} -> {}", name, endpoint);
        Ok(Self {
            name,
            endpoint,
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl GenerationProvider for ChatCompletionsProvider {
    fn complete(&self, profile: &ModelProfile, messages: &[ChatMessage]) -> GenerationResult<String> {
        let credential = profile
            .credential
            .as_deref()
            .ok_or(GenerationError::MissingCredential {
                provider: profile.provider,
            })?;

        let request = CompletionRequest {
            model: &profile.model,
            messages,
            temperature: profile.temperature,
            max_tokens: profile.max_tokens,
        };

        debug!(
            "Requesting completion from {} (model={}, max_tokens={})",
            self.name, profile.model, profile.max_tokens
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(credential)
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|r| r.error.message)
                .unwrap_or(body);
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: CompletionResponse = response
            .json()
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| GenerationError::InvalidResponse("response contained no message".to_string()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
