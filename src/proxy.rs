//! Completion proxy: keeps the provider credential on the server.
//!
//! The widget posts the same chat-completions body it would send upstream.
//! Only the user/assistant transcript is taken from it: the proxy supplies
//! its own system preamble, model and token cap, attaches the bearer token
//! and attribution headers, and returns the provider's JSON.

use crate::ai::{CompletionRequest, WireMessage, upstream_error_message};
use crate::config::ProxyConfig;
use crate::profile::PROFILE;
use crate::types::Role;
use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderName, HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub struct ProxyState {
    client: reqwest::Client,
    upstream: String,
    model: String,
    max_tokens: u32,
    preamble: String,
    api_key: Option<String>,
    site_url: Option<String>,
    site_title: String,
}

impl ProxyState {
    pub fn new(config: &ProxyConfig) -> Result<Self> {
        let client = upstream_client(config)
            .build()
            .context("failed to build upstream HTTP client")?;
        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: &ProxyConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            upstream: config.upstream.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            preamble: PROFILE.system_prompt(),
            api_key: config.api_key.clone(),
            site_url: config.site_url.clone(),
            site_title: config.site_title.clone(),
        }
    }

    /// Swap the system preamble sent upstream.
    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = preamble.into();
        self
    }

    /// The body sent upstream: server preamble, the caller's user and
    /// assistant turns, the configured model and a capped token budget.
    fn outbound(&self, body: ChatBody) -> Result<CompletionRequest, ProxyError> {
        let mut messages = Vec::with_capacity(body.messages.len() + 1);
        messages.push(WireMessage::system(self.preamble.as_str()));
        messages.extend(body.messages.into_iter().filter_map(|msg| {
            let role = match msg.role.as_str() {
                "user" => Role::User,
                "assistant" => Role::Assistant,
                other => {
                    tracing::debug!(role = other, "dropping caller-supplied message");
                    return None;
                }
            };
            Some(WireMessage {
                role: role.as_str(),
                content: msg.content,
            })
        }));

        if messages.last().map(|m| m.role) != Some(Role::User.as_str()) {
            return Err(ProxyError::BadRequest(
                "transcript must end with a user message".into(),
            ));
        }

        let max_tokens = body
            .max_tokens
            .map_or(self.max_tokens, |n| n.clamp(1, self.max_tokens));

        Ok(CompletionRequest {
            model: self.model.clone(),
            messages,
            max_tokens,
        })
    }
}

/// HTTP client for upstream calls, bounded by the configured timeout.
pub fn upstream_client(config: &ProxyConfig) -> reqwest::ClientBuilder {
    reqwest::Client::builder().timeout(config.upstream_timeout)
}

#[derive(Deserialize)]
struct InboundMessage {
    role: String,
    content: String,
}

// Other fields (model, temperature, ...) are accepted and ignored.
#[derive(Deserialize)]
struct ChatBody {
    messages: Vec<InboundMessage>,
    max_tokens: Option<u32>,
}

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("API key not configured")]
    MissingKey,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("upstream timed out")]
    Timeout,

    #[error("upstream unreachable: {0}")]
    Unreachable(reqwest::Error),

    #[error("upstream error: {0}")]
    Upstream(String),
}

impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProxyError::Timeout
        } else {
            ProxyError::Unreachable(err)
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = match self {
            ProxyError::MissingKey => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ProxyError::Timeout | ProxyError::Unreachable(_) | ProxyError::Upstream(_) => {
                StatusCode::BAD_GATEWAY
            }
        };
        tracing::warn!(error = %self, %status, "proxy request failed");
        let body = Json(json!({ "error": { "message": self.to_string() } }));
        (status, body).into_response()
    }
}

/// Build the proxy router with CORS limited to the configured origin.
pub fn create_router(config: &ProxyConfig) -> Result<Router> {
    build_router(config, ProxyState::new(config)?)
}

pub fn build_router(config: &ProxyConfig, state: ProxyState) -> Result<Router> {
    let origin = HeaderValue::from_str(&config.allowed_origin)
        .with_context(|| format!("invalid allowed origin {:?}", config.allowed_origin))?;
    // The widget sends its attribution headers on the cross-origin POST.
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("http-referer"),
            HeaderName::from_static("x-title"),
        ]);

    Ok(Router::new()
        .route("/", get(health))
        .route("/chat", post(forward_chat))
        .with_state(Arc::new(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

async fn health(State(state): State<Arc<ProxyState>>) -> Json<Value> {
    Json(json!({ "status": format!("{} API is running", state.site_title) }))
}

async fn forward_chat(
    State(state): State<Arc<ProxyState>>,
    Json(body): Json<ChatBody>,
) -> Result<Json<Value>, ProxyError> {
    let key = state.api_key.as_deref().ok_or(ProxyError::MissingKey)?;
    let outbound = state.outbound(body)?;

    let mut request = state
        .client
        .post(&state.upstream)
        .bearer_auth(key)
        .header("X-Title", &state.site_title)
        .json(&outbound);
    if let Some(url) = &state.site_url {
        request = request.header("HTTP-Referer", url);
    }

    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        let message = upstream_error_message(&text).unwrap_or_else(|| format!("{status}: {text}"));
        return Err(ProxyError::Upstream(message));
    }

    let value: Value = match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(_) => return Err(ProxyError::Upstream(format!("{status}: {text}"))),
    };
    if value.get("choices").is_none() {
        let message = upstream_error_message(&text).unwrap_or(text);
        return Err(ProxyError::Upstream(message));
    }

    tracing::debug!(%status, model = %outbound.model, "forwarded completion");
    Ok(Json(value))
}
