//! HTTP client for an OpenAI-compatible chat-completions endpoint.
//!
//! The external capability is stateless between calls; every request carries
//! its full context. The client performs a small bounded retry on transport
//! failures (connect/timeout) only — HTTP-level failures are classified and
//! returned immediately.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use super::{classify_failure, UpstreamError};
use crate::config::{UPSTREAM_MAX_ATTEMPTS, UPSTREAM_TIMEOUT_SECS};

// ──────────────────────────────────────────────
// Wire types
// ──────────────────────────────────────────────

/// One message in a chat-completions request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: "assistant".into(),
            content: MessageContent::Text(text.into()),
        }
    }

    /// User message carrying instructional text plus an inline image data URL.
    pub fn user_with_image(text: impl Into<String>, image_data_url: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: MessageContent::Parts(vec![
                ContentPart::Text { text: text.into() },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image_data_url.into(),
                    },
                },
            ]),
        }
    }
}

/// Message content: either a plain string or multimodal parts.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

/// Per-call model parameters.
#[derive(Debug, Clone, Copy)]
pub struct SamplingParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Request body for POST /chat/completions
#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

/// Response body from POST /chat/completions
#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

// ──────────────────────────────────────────────
// Trait + production client
// ──────────────────────────────────────────────

/// A text/image-capable model invocation: full message list in, one reply out.
pub trait ChatCompletion: Send + Sync {
    fn complete(
        &self,
        messages: &[ChatMessage],
        params: SamplingParams,
    ) -> Result<String, UpstreamError>;
}

/// Production client for an OpenAI-compatible endpoint.
pub struct OpenAiChatClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::blocking::Client,
}

impl OpenAiChatClient {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Result<Self, UpstreamError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(UPSTREAM_TIMEOUT_SECS))
            .build()
            .map_err(|e| UpstreamError::Generic(format!("HTTP client construction: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client,
        })
    }

    fn send_once(
        &self,
        body: &CompletionRequest<'_>,
    ) -> Result<reqwest::blocking::Response, reqwest::Error> {
        self.client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
    }
}

impl ChatCompletion for OpenAiChatClient {
    fn complete(
        &self,
        messages: &[ChatMessage],
        params: SamplingParams,
    ) -> Result<String, UpstreamError> {
        let body = CompletionRequest {
            model: &self.model,
            messages,
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        };

        let start = std::time::Instant::now();

        let mut attempt = 1;
        let response = loop {
            match self.send_once(&body) {
                Ok(response) => break response,
                Err(e) if (e.is_connect() || e.is_timeout()) && attempt < UPSTREAM_MAX_ATTEMPTS => {
                    tracing::warn!(attempt, error = %e, "Upstream transport failure, retrying");
                    attempt += 1;
                }
                Err(e) => {
                    return Err(UpstreamError::Generic(format!(
                        "Request failed after {attempt} attempt(s): {e}"
                    )));
                }
            }
        };

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            tracing::error!(status = %status, detail, "Upstream returned error status");
            return Err(classify_failure(&format!("HTTP {status}: {detail}")));
        }

        let parsed: CompletionResponse = response
            .json()
            .map_err(|e| UpstreamError::Generic(format!("Response parsing: {e}")))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.is_empty())
            .ok_or(UpstreamError::NoContent)?;

        tracing::info!(
            model = %self.model,
            elapsed_ms = %start.elapsed().as_millis(),
            response_len = content.len(),
            "Upstream completion received"
        );

        Ok(content)
    }
}

// ──────────────────────────────────────────────
// MockChatModel (testing)
// ──────────────────────────────────────────────

/// Mock model client — returns a configured reply or error, and records
/// every message list it receives so tests can assert on transmitted context.
pub struct MockChatModel {
    reply: Result<String, UpstreamError>,
    calls: AtomicUsize,
    seen: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockChatModel {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: UpstreamError) -> Self {
        Self {
            reply: Err(error),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Number of times `complete` was invoked.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Message lists received, one entry per call.
    pub fn seen_messages(&self) -> Vec<Vec<ChatMessage>> {
        self.seen.lock().expect("mock lock").clone()
    }
}

impl ChatCompletion for MockChatModel {
    fn complete(
        &self,
        messages: &[ChatMessage],
        _params: SamplingParams,
    ) -> Result<String, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().expect("mock lock").push(messages.to_vec());
        self.reply.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_message_serializes_as_plain_string() {
        let msg = ChatMessage::system("Be helpful");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "Be helpful");
    }

    #[test]
    fn image_message_serializes_as_parts() {
        let msg = ChatMessage::user_with_image("Analyze this", "data:image/jpeg;base64,AAAA");
        let json = serde_json::to_value(&msg).unwrap();
        let parts = json["content"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["type"], "text");
        assert_eq!(parts[0]["text"], "Analyze this");
        assert_eq!(parts[1]["type"], "image_url");
        assert_eq!(parts[1]["image_url"]["url"], "data:image/jpeg;base64,AAAA");
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = OpenAiChatClient::new("http://localhost:8000/", "sk-test", "gpt-4o-mini")
            .unwrap();
        assert_eq!(client.base_url, "http://localhost:8000");
    }

    #[test]
    fn mock_returns_configured_reply_and_counts_calls() {
        let mock = MockChatModel::new("reply text");
        assert_eq!(mock.call_count(), 0);
        let out = mock
            .complete(
                &[ChatMessage::user("hi")],
                SamplingParams {
                    max_tokens: 10,
                    temperature: 0.0,
                },
            )
            .unwrap();
        assert_eq!(out, "reply text");
        assert_eq!(mock.call_count(), 1);
        assert_eq!(mock.seen_messages().len(), 1);
    }

    #[test]
    fn mock_propagates_configured_error() {
        let mock = MockChatModel::failing(UpstreamError::NoContent);
        let result = mock.complete(
            &[ChatMessage::user("hi")],
            SamplingParams {
                max_tokens: 10,
                temperature: 0.0,
            },
        );
        assert!(matches!(result, Err(UpstreamError::NoContent)));
    }
}
