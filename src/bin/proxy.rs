//! folio-proxy - holds the completion credential so the web build never ships it.

use anyhow::Context;
use folio::config::ProxyConfig;
use folio::proxy::create_router;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio=info,tower_http=info".into()),
        )
        .init();

    let config = ProxyConfig::load()?;
    if config.api_key.is_none() {
        tracing::warn!("FOLIO_CHAT_API_KEY is not set; /chat will answer with an error");
    }

    let app = create_router(&config)?;
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    tracing::info!(
        addr = %config.addr,
        upstream = %config.upstream,
        origin = %config.allowed_origin,
        model = %config.model,
        max_tokens = config.max_tokens,
        timeout = ?config.upstream_timeout,
        "completion proxy listening"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
