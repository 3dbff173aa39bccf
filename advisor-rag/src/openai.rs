//! OpenAI answerer using the chat completions API.
//!
//! This module is only available when the `openai` feature is enabled.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::answerer::{AnswerError, AnswerRequest, Answerer, RawAnswer, parse_raw_answer};
use crate::prompt::{DEFAULT_HISTORY_WINDOW, system_prompt, user_prompt};

/// The default OpenAI API base URL.
const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// The default chat model.
const DEFAULT_MODEL: &str = "gpt-4o-mini";

const TEMPERATURE: f32 = 0.1;
const MAX_TOKENS: u32 = 1000;

/// An [`Answerer`] backed by the OpenAI chat completions API.
///
/// Uses `reqwest` to call `/chat/completions` directly with a JSON response
/// format.
///
/// # Configuration
///
/// - `model` – defaults to `gpt-4o-mini`.
/// - `base_url` – defaults to the public OpenAI API; any compatible endpoint works.
/// - `history_window` – number of recent history messages in the prompt (default 6).
/// - `api_key` – from the constructor or the `OPENAI_API_KEY` environment variable.
///
/// # Example
///
/// ```rust,ignore
/// use advisor_rag::openai::OpenAIAnswerer;
///
/// let answerer = OpenAIAnswerer::from_env()?.with_model("gpt-4o");
/// ```
pub struct OpenAIAnswerer {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    history_window: usize,
}

impl OpenAIAnswerer {
    /// Create a new answerer with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self, AnswerError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(AnswerError::Misconfigured("API key must not be empty".into()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: DEFAULT_MODEL.into(),
            base_url: OPENAI_API_BASE.into(),
            history_window: DEFAULT_HISTORY_WINDOW,
        })
    }

    /// Create a new answerer using the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self, AnswerError> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            AnswerError::Misconfigured("OPENAI_API_KEY environment variable not set".into())
        })?;
        Self::new(api_key)
    }

    /// Set the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point the answerer at an OpenAI-compatible endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set how many recent history messages are included in the prompt.
    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }
}

// ── OpenAI API request/response types ──────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatRequestMessage<'a>>,
    response_format: ResponseFormat,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatRequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Map a non-success HTTP status to an [`AnswerError`].
fn status_error(status: StatusCode, detail: String) -> AnswerError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AnswerError::Unauthorized,
        StatusCode::TOO_MANY_REQUESTS => AnswerError::RateLimited,
        _ => AnswerError::Transport(format!("API returned {status}: {detail}")),
    }
}

// ── Answerer implementation ────────────────────────────────────────

#[async_trait]
impl Answerer for OpenAIAnswerer {
    async fn answer(&self, request: AnswerRequest) -> Result<RawAnswer, AnswerError> {
        debug!(
            provider = "OpenAI",
            model = %self.model,
            chunk_count = request.chunks.len(),
            history_len = request.history.len(),
            "requesting answer"
        );

        let user = user_prompt(&request, self.history_window);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatRequestMessage { role: "system", content: system_prompt() },
                ChatRequestMessage { role: "user", content: &user },
            ],
            response_format: ResponseFormat { kind: "json_object" },
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "OpenAI", error = %e, "request failed");
                AnswerError::Transport(format!("request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            error!(provider = "OpenAI", %status, "API error");
            return Err(status_error(status, detail));
        }

        let chat: ChatResponse = response.json().await.map_err(|e| {
            error!(provider = "OpenAI", error = %e, "failed to parse response");
            AnswerError::Parse(format!("failed to parse response: {e}"))
        })?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| AnswerError::Parse("completion has no content".into()))?;

        parse_raw_answer(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_is_misconfigured() {
        assert!(matches!(OpenAIAnswerer::new(""), Err(AnswerError::Misconfigured(_))));
    }

    #[test]
    fn statuses_map_to_error_kinds() {
        assert_eq!(status_error(StatusCode::UNAUTHORIZED, String::new()), AnswerError::Unauthorized);
        assert_eq!(status_error(StatusCode::TOO_MANY_REQUESTS, String::new()), AnswerError::RateLimited);
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY, "upstream".into()),
            AnswerError::Transport(msg) if msg.contains("upstream")
        ));
    }

    #[test]
    fn base_url_is_normalized() {
        let answerer = OpenAIAnswerer::new("sk-test")
            .expect("non-empty key")
            .with_base_url("http://localhost:8080/v1/");
        assert_eq!(answerer.base_url, "http://localhost:8080/v1");
    }
}
