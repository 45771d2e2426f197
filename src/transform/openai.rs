//! Chat-completions client
//!
//! The request is async (`reqwest`) but callers are UI handlers, so
//! [`CompletionService::complete`] blocks on the app's tokio runtime.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tracing::{debug, info};

use super::{CompletionService, RemoteServiceError};

/// Completions endpoint
const ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Model used when the config names none
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Sampling temperature for every request
const TEMPERATURE: f32 = 0.7;

/// Upper bound on a single request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Longest error body kept in messages
const ERROR_SNIPPET_CHARS: usize = 240;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// [`CompletionService`] for the OpenAI chat-completions API
pub struct OpenAiService {
    client: reqwest::Client,
    runtime: Handle,
    api_key: String,
    model: String,
}

impl OpenAiService {
    /// Create a client that runs requests on `runtime`
    pub fn new(
        runtime: Handle,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, RemoteServiceError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RemoteServiceError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            runtime,
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    async fn request(&self, prompt: &str) -> Result<String, RemoteServiceError> {
        let body = build_request(&self.model, prompt);
        debug!(
            model = %self.model,
            prompt_chars = prompt.chars().count(),
            "sending completion request"
        );

        let resp = self
            .client
            .post(ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| RemoteServiceError::Transport(e.to_string()))?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(classify_failure(status, &text));
        }

        let parsed: ChatResponse = resp
            .json()
            .await
            .map_err(|e| RemoteServiceError::Transport(e.to_string()))?;
        let reply = extract_reply(parsed)?;
        info!(model = %self.model, reply_chars = reply.chars().count(), "completion received");
        Ok(reply)
    }
}

impl CompletionService for OpenAiService {
    fn complete(&self, prompt: &str) -> Result<String, RemoteServiceError> {
        self.runtime.block_on(self.request(prompt))
    }
}

fn build_request<'a>(model: &'a str, prompt: &'a str) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: vec![ChatMessage {
            role: "user",
            content: prompt,
        }],
        temperature: TEMPERATURE,
    }
}

fn extract_reply(response: ChatResponse) -> Result<String, RemoteServiceError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or(RemoteServiceError::EmptyResponse)
}

/// Map a non-success response to an error
fn classify_failure(status: u16, body: &str) -> RemoteServiceError {
    let message = error_message(body);
    match status {
        401 | 403 => RemoteServiceError::Auth { status, message },
        429 => RemoteServiceError::Quota(message),
        _ => RemoteServiceError::Http { status, message },
    }
}

/// Prefer the API's `error.message`, else a truncated body
fn error_message(body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        });

    let message = from_json.unwrap_or_else(|| body.trim().to_string());
    if message.chars().count() > ERROR_SNIPPET_CHARS {
        let cut: String = message.chars().take(ERROR_SNIPPET_CHARS).collect();
        format!("{}…", cut)
    } else {
        message
    }
}
