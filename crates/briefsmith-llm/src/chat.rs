//! Shared wire types and error mapping for OpenAI-compatible chat APIs

use crate::LlmError;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Request body for chat completions
#[derive(Serialize)]
pub(crate) struct ChatRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<&'a str>,
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f32,
    pub max_tokens: usize,
}

#[derive(Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

impl<'a> ChatRequest<'a> {
    /// Single user message request
    pub fn user(model: Option<&'a str>, prompt: &'a str, temperature: f32, max_tokens: usize) -> Self {
        Self {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature,
            max_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Map a non-success HTTP status to a classified error
pub(crate) fn classify_status(status: StatusCode, body: &str) -> LlmError {
    let detail = format!("HTTP {}: {}", status, body);
    match status.as_u16() {
        429 => LlmError::RateLimitExceeded(detail),
        401 | 403 => LlmError::Authentication(detail),
        404 => LlmError::ModelNotAvailable(detail),
        408 => LlmError::Communication(detail),
        s if s >= 500 => LlmError::Communication(detail),
        _ => LlmError::Rejected(detail),
    }
}

/// Send a chat request and return the first choice's trimmed content
pub(crate) async fn send_chat(
    request: reqwest::RequestBuilder,
    body: &ChatRequest<'_>,
) -> Result<String, LlmError> {
    let response = request
        .json(body)
        .send()
        .await
        .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "<body unavailable>".to_string());
        return Err(classify_status(status, &text));
    }

    let parsed: ChatResponse = response
        .json()
        .await
        .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| LlmError::InvalidResponse("Response contained no message content".to_string()))
}
