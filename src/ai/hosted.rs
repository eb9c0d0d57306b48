use super::{ChatError, ChatResult, CompletionRequest, LlmBackend};
use crate::config::ChatConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// Client for a hosted OpenAI-compatible chat-completions endpoint
pub struct HostedBackend {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    site_url: Option<String>,
    site_title: Option<String>,
}

impl HostedBackend {
    pub fn new(config: &ChatConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    pub fn with_client(config: &ChatConfig, client: Client) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            site_url: config.site_url.clone(),
            site_title: config.site_title.clone(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

// Response shapes: { choices: [{ message: { content } }] } or { error: { message } }
#[derive(Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: Option<CompletionMessage>,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct UpstreamErrorBody {
    message: Option<String>,
}

#[derive(Deserialize)]
struct UpstreamErrorEnvelope {
    error: Option<UpstreamErrorBody>,
}

/// Pull `choices[0].message.content` out of a response body.
///
/// A body that is not JSON is a decode error; valid JSON without a non-blank
/// reply is [`ChatError::MissingReply`].
pub fn extract_reply(body: &str) -> ChatResult<String> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    let parsed = match serde_json::from_value::<CompletionResponse>(value) {
        Ok(parsed) => parsed,
        Err(_) => return Err(ChatError::MissingReply),
    };

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(ChatError::MissingReply)
}

/// The provider's own explanation from an `{"error": {"message": ...}}` body.
pub fn upstream_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<UpstreamErrorEnvelope>(body)
        .ok()?
        .error?
        .message
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl LlmBackend for HostedBackend {
    async fn complete(&self, request: &CompletionRequest) -> ChatResult<String> {
        let mut builder = self.client.post(&self.endpoint).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        if let Some(url) = &self.site_url {
            builder = builder.header("HTTP-Referer", url);
        }
        if let Some(title) = &self.site_title {
            builder = builder.header("X-Title", title);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = upstream_error_message(&body).unwrap_or(body);
            return Err(ChatError::Status {
                status: status.as_u16(),
                message,
            });
        }

        match extract_reply(&body) {
            Err(ChatError::MissingReply) => {
                if let Some(message) = upstream_error_message(&body) {
                    tracing::warn!(%message, "completion endpoint reported an error");
                }
                Err(ChatError::MissingReply)
            }
            other => other,
        }
    }
}
