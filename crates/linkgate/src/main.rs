use std::sync::Arc;

use anyhow::{Context, Result};
use linkgate::prelude::*;
use linkgate::telemetry::init_tracing;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let settings = Settings::load().context("failed to load settings")?;
    tracing::info!(
        content = %settings.content.base_url,
        access_keys = settings.access.keys.len(),
        "configuration loaded"
    );

    let content = WordPressSource::new(&settings.content)?;
    let auth = StaticKeyAuthenticator::new(settings.access.keys.clone());

    let gateway = Gateway::<StaticKeyAuthenticator, WordPressSource>::builder()
        .session_config(settings.session.clone())
        .vault_config(settings.vault.clone())
        .payload_salt(settings.payload.salt.clone())
        .upstream_timeout(settings.content.timeout())
        .channel_size(settings.gateway.channel_size)
        .build(MemoryStore::new(), auth, content)?;
    let gateway = Arc::new(gateway);

    let bind_addr = settings.server.bind_addr();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    serve(listener, Arc::clone(&gateway)).await?;

    gateway.handle().shutdown().await?;
    tracing::info!("linkgate stopped");
    Ok(())
}
