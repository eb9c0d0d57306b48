//! Runtime configuration for the chat widget and the completion proxy.
//!
//! Values come from the process environment first (a `.env` file is loaded
//! into it by the binaries on native targets), then from the bundled
//! `assets/config.env` compiled into the app. The bundled file never supplies
//! credentials.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

/// Bundled config for builds that have no process environment (web, mobile)
const BUNDLED_CONFIG: &str = include_str!("../assets/config.env");

pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_MAX_TOKENS: u32 = 300;

pub const ENV_ENDPOINT: &str = "FOLIO_CHAT_ENDPOINT";
pub const ENV_MODEL: &str = "FOLIO_CHAT_MODEL";
pub const ENV_MAX_TOKENS: &str = "FOLIO_CHAT_MAX_TOKENS";
pub const ENV_API_KEY: &str = "FOLIO_CHAT_API_KEY";
pub const ENV_SITE_URL: &str = "FOLIO_SITE_URL";
pub const ENV_SITE_TITLE: &str = "FOLIO_SITE_TITLE";
pub const ENV_PROXY_UPSTREAM: &str = "FOLIO_PROXY_UPSTREAM";
pub const ENV_PROXY_ADDR: &str = "FOLIO_PROXY_ADDR";
pub const ENV_PROXY_ALLOWED_ORIGIN: &str = "FOLIO_PROXY_ALLOWED_ORIGIN";
pub const ENV_PROXY_TIMEOUT_SECS: &str = "FOLIO_PROXY_TIMEOUT_SECS";

pub const DEFAULT_PROXY_ADDR: &str = "127.0.0.1:8787";
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:8080";
pub const DEFAULT_SITE_TITLE: &str = "Portfolio";
pub const DEFAULT_PROXY_TIMEOUT_SECS: u64 = 30;

/// Layered key/value lookup: runtime values win over bundled ones.
#[derive(Clone, Debug, Default)]
pub struct ConfigSources {
    runtime: HashMap<String, String>,
    bundled: HashMap<String, String>,
}

impl ConfigSources {
    pub fn new(runtime: HashMap<String, String>, bundled: HashMap<String, String>) -> Self {
        Self { runtime, bundled }
    }

    /// Snapshot of the current process environment layered over the bundled file.
    pub fn from_process() -> Self {
        Self::new(std::env::vars().collect(), parse_env_file(BUNDLED_CONFIG))
    }

    /// Look a key up in both layers, skipping blank values.
    pub fn get(&self, key: &str) -> Option<&str> {
        non_blank(self.runtime.get(key)).or_else(|| non_blank(self.bundled.get(key)))
    }

    /// Look a secret up in the runtime layer only.
    pub fn secret(&self, key: &str) -> Option<&str> {
        if non_blank(self.bundled.get(key)).is_some() {
            tracing::warn!(key, "ignoring credential found in bundled config");
        }
        non_blank(self.runtime.get(key))
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Parse `KEY=VALUE` lines, skipping comments and blank lines.
pub fn parse_env_file(contents: &str) -> HashMap<String, String> {
    let mut values = HashMap::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            values.insert(key.trim().to_string(), value.to_string());
        }
    }
    values
}

/// Everything the completion client needs for one outbound request.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatConfig {
    pub endpoint: String,
    pub model: String,
    pub max_tokens: u32,
    pub api_key: Option<String>,
    pub site_url: Option<String>,
    pub site_title: Option<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            api_key: None,
            site_url: None,
            site_title: None,
        }
    }
}

impl ChatConfig {
    /// Load from the process environment and the bundled config.
    pub fn load() -> Result<Self> {
        Self::from_sources(&ConfigSources::from_process())
    }

    pub fn from_sources(sources: &ConfigSources) -> Result<Self> {
        let max_tokens = match sources.get(ENV_MAX_TOKENS) {
            Some(raw) => parse_max_tokens(raw)
                .with_context(|| format!("invalid {ENV_MAX_TOKENS} value {raw:?}"))?,
            None => DEFAULT_MAX_TOKENS,
        };

        Ok(Self {
            endpoint: sources.get_or(ENV_ENDPOINT, DEFAULT_ENDPOINT),
            model: sources.get_or(ENV_MODEL, DEFAULT_MODEL),
            max_tokens,
            api_key: sources.secret(ENV_API_KEY).map(str::to_string),
            site_url: sources.get(ENV_SITE_URL).map(str::to_string),
            site_title: sources.get(ENV_SITE_TITLE).map(str::to_string),
        })
    }
}

/// Settings for `folio-proxy`, which holds the credential server-side.
///
/// `model` and `max_tokens` are enforced on every forwarded request; callers
/// cannot pick their own.
#[derive(Clone, Debug, PartialEq)]
pub struct ProxyConfig {
    pub addr: SocketAddr,
    pub allowed_origin: String,
    pub upstream: String,
    pub upstream_timeout: Duration,
    pub model: String,
    pub max_tokens: u32,
    pub api_key: Option<String>,
    pub site_url: Option<String>,
    pub site_title: String,
}

impl ProxyConfig {
    pub fn load() -> Result<Self> {
        Self::from_sources(&ConfigSources::from_process())
    }

    pub fn from_sources(sources: &ConfigSources) -> Result<Self> {
        let raw_addr = sources.get_or(ENV_PROXY_ADDR, DEFAULT_PROXY_ADDR);
        let addr = raw_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("invalid {ENV_PROXY_ADDR} value {raw_addr:?}"))?;
        let max_tokens = match sources.get(ENV_MAX_TOKENS) {
            Some(raw) => parse_max_tokens(raw)
                .with_context(|| format!("invalid {ENV_MAX_TOKENS} value {raw:?}"))?,
            None => DEFAULT_MAX_TOKENS,
        };
        let timeout_secs = match sources.get(ENV_PROXY_TIMEOUT_SECS) {
            Some(raw) => parse_timeout_secs(raw)
                .with_context(|| format!("invalid {ENV_PROXY_TIMEOUT_SECS} value {raw:?}"))?,
            None => DEFAULT_PROXY_TIMEOUT_SECS,
        };

        Ok(Self {
            addr,
            allowed_origin: sources.get_or(ENV_PROXY_ALLOWED_ORIGIN, DEFAULT_ALLOWED_ORIGIN),
            upstream: sources.get_or(ENV_PROXY_UPSTREAM, DEFAULT_ENDPOINT),
            upstream_timeout: Duration::from_secs(timeout_secs),
            model: sources.get_or(ENV_MODEL, DEFAULT_MODEL),
            max_tokens,
            api_key: sources.secret(ENV_API_KEY).map(str::to_string),
            site_url: sources.get(ENV_SITE_URL).map(str::to_string),
            site_title: sources.get_or(ENV_SITE_TITLE, DEFAULT_SITE_TITLE),
        })
    }
}

fn parse_max_tokens(raw: &str) -> Result<u32> {
    let value: u32 = raw.parse()?;
    if value == 0 {
        anyhow::bail!("token cap must be positive");
    }
    Ok(value)
}

fn parse_timeout_secs(raw: &str) -> Result<u64> {
    let value: u64 = raw.parse()?;
    if value == 0 {
        anyhow::bail!("timeout must be at least one second");
    }
    Ok(value)
}
