//! `OpenAI` chat-completions provider implementation

use super::CompletionService;
use crate::error::DispatchError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

const SYSTEM_PROMPT: &str =
    "You are a helpful assistant. Provide clear, concise, and friendly responses.";
const MAX_TOKENS: u32 = 150;
const TEMPERATURE: f32 = 0.7;

/// OpenAI-compatible chat-completions client
pub struct OpenAIService {
    client: Client,
    api_key: Option<String>,
    model_id: String,
    endpoint: String,
}

impl OpenAIService {
    /// `base_url` is the API root, e.g. `https://api.openai.com/v1`.
    pub fn new(api_key: Option<String>, model: impl Into<String>, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.filter(|k| !k.is_empty()),
            model_id: model.into(),
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
        }
    }

    fn translate_request<'a>(&'a self, user_text: &'a str) -> OpenAIRequest<'a> {
        OpenAIRequest {
            model: &self.model_id,
            messages: vec![
                OpenAIMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                OpenAIMessage {
                    role: "user",
                    content: user_text,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        }
    }

    fn normalize_response(resp: OpenAIResponse) -> Result<String, DispatchError> {
        resp.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| DispatchError::empty_response("No response received from ChatGPT"))
    }

    fn classify_failure(status: StatusCode, body: &str) -> DispatchError {
        let message = serde_json::from_str::<OpenAIErrorResponse>(body).map_or_else(
            |_| {
                if body.trim().is_empty() {
                    format!("HTTP {status}")
                } else {
                    body.trim().to_string()
                }
            },
            |resp| resp.error.message,
        );
        tracing::debug!(status = %status, provider_message = %message, "Completion provider rejected request");

        match status.as_u16() {
            401 => DispatchError::auth("Invalid OpenAI API key. Please check your configuration."),
            429 => DispatchError::rate_limit("Rate limit exceeded. Please try again later."),
            _ => DispatchError::provider(format!("OpenAI error: {message}")),
        }
    }
}

#[async_trait]
impl CompletionService for OpenAIService {
    async fn complete(&self, user_text: &str) -> Result<String, DispatchError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            DispatchError::config(
                "OpenAI API key not configured. Please check your environment variables.",
            )
        })?;

        let request = self.translate_request(user_text);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() || e.is_request() {
                    tracing::debug!(error = %e, "Completion transport failure");
                    DispatchError::network("Network error. Please check your connection.")
                } else {
                    DispatchError::provider(format!("OpenAI error: {e}"))
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::debug!(error = %e, "Failed to read completion response");
            DispatchError::network("Network error. Please check your connection.")
        })?;

        if !status.is_success() {
            return Err(Self::classify_failure(status, &body));
        }

        let parsed: OpenAIResponse = serde_json::from_str(&body).map_err(|e| {
            DispatchError::provider(format!("OpenAI error: failed to parse response: {e}"))
        })?;

        Self::normalize_response(parsed)
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

// OpenAI API types

#[derive(Debug, Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAIMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIErrorResponse {
    error: OpenAIError,
}

#[derive(Debug, Deserialize)]
struct OpenAIError {
    message: String,
}
