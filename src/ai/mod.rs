//! AI module for the portfolio assistant
//!
//! Talks to an OpenAI-compatible chat-completions endpoint (Groq by default,
//! or the bundled `folio-proxy`) and turns every outcome into text the chat
//! widget can show.
//!
//! # Architecture
//!
//! - `client` - `CompletionClient`, which builds the outbound transcript and
//!   never fails: errors become fallback text
//! - `hosted` - `HostedBackend`, the reqwest implementation of [`LlmBackend`]
//!
//! # Usage
//!
//! ```rust,no_run
//! use folio::ai::CompletionClient;
//! use folio::config::ChatConfig;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = CompletionClient::hosted(ChatConfig::load()?, "Be brief.");
//! let reply = client.send_turn("What are your skills?", &[]).await;
//! # Ok(())
//! # }
//! ```
mod client;
mod hosted;

use async_trait::async_trait;
use serde::Serialize;

pub use client::{CONNECTION_FALLBACK, CompletionClient, NO_REPLY_FALLBACK};
pub use hosted::{HostedBackend, extract_reply, upstream_error_message};

// ============================================
// Error Types
// ============================================

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("endpoint returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("response carried no reply text")]
    MissingReply,
}

impl ChatError {
    /// The literal assistant text shown in place of a reply.
    pub fn fallback_text(&self) -> &'static str {
        match self {
            ChatError::Transport(_) | ChatError::Decode(_) => CONNECTION_FALLBACK,
            ChatError::Status { .. } | ChatError::MissingReply => NO_REPLY_FALLBACK,
        }
    }
}

pub type ChatResult<T> = Result<T, ChatError>;

// ============================================
// Backend seam
// ============================================

/// One message as it goes over the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WireMessage {
    pub role: &'static str,
    pub content: String,
}

impl WireMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }
}

/// Body of a chat-completions request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    pub max_tokens: u32,
}

/// Anything that can answer a completion request with reply text.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait LlmBackend: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> ChatResult<String>;
}
