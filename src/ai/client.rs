use super::{ChatResult, CompletionRequest, HostedBackend, LlmBackend, WireMessage};
use crate::config::ChatConfig;
use crate::types::ChatMessage;
use std::sync::Arc;

/// Shown when the endpoint answered but no reply could be read from it.
pub const NO_REPLY_FALLBACK: &str = "Sorry, I couldn't respond.";

/// Shown when the endpoint could not be reached or its body was not JSON.
pub const CONNECTION_FALLBACK: &str = "Error connecting to AI.";

/// Builds outbound transcripts and hands them to a backend.
///
/// Cheap to clone; the backend is shared.
#[derive(Clone)]
pub struct CompletionClient {
    backend: Arc<dyn LlmBackend>,
    preamble: Arc<str>,
    model: String,
    max_tokens: u32,
}

impl CompletionClient {
    pub fn new(
        backend: Arc<dyn LlmBackend>,
        preamble: impl Into<Arc<str>>,
        model: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        Self {
            backend,
            preamble: preamble.into(),
            model: model.into(),
            max_tokens,
        }
    }

    /// Client for the configured hosted endpoint.
    pub fn hosted(config: ChatConfig, preamble: impl Into<Arc<str>>) -> Self {
        let backend = Arc::new(HostedBackend::new(&config));
        Self::new(backend, preamble, config.model, config.max_tokens)
    }

    /// System preamble, then the prior transcript, then the new user text.
    pub fn build_request(&self, user_text: &str, prior: &[ChatMessage]) -> CompletionRequest {
        let mut messages = Vec::with_capacity(prior.len() + 2);
        messages.push(WireMessage::system(self.preamble.as_ref()));
        messages.extend(prior.iter().map(|msg| WireMessage {
            role: msg.role.as_str(),
            content: msg.content.clone(),
        }));
        messages.push(WireMessage {
            role: "user",
            content: user_text.to_string(),
        });

        CompletionRequest {
            model: self.model.clone(),
            messages,
            max_tokens: self.max_tokens,
        }
    }

    /// One outbound call; errors are returned to the caller.
    pub async fn complete(&self, user_text: &str, prior: &[ChatMessage]) -> ChatResult<String> {
        let request = self.build_request(user_text, prior);
        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            "sending completion request"
        );
        self.backend.complete(&request).await
    }

    /// One outbound call that always yields assistant text.
    pub async fn send_turn(&self, user_text: &str, prior: &[ChatMessage]) -> String {
        match self.complete(user_text, prior).await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!(error = %err, "completion failed, substituting fallback");
                err.fallback_text().to_string()
            }
        }
    }
}
