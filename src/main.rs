use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use plex_anilist_scrobbler::{
    config::AppConfig,
    handlers::{Dispatcher, WebhookServer, WebhookServerTrait},
    providers::StructuredLogger,
    services::{HandleSweeper, InMemoryTokenStore, TokenStore},
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;

    StructuredLogger::init(&config.logger)?;

    info!("Starting PLEX to AniList scrobbler");

    let token_store: Arc<dyn TokenStore + Send + Sync> = Arc::new(InMemoryTokenStore::new(
        Duration::from_secs(config.webhook.handle_ttl_secs),
    ));
    let sweeper = HandleSweeper::new(
        Arc::clone(&token_store),
        Duration::from_secs(config.webhook.sweep_interval_secs),
    );
    let dispatcher = Dispatcher::new(&config, token_store)?;
    let webhook_server = WebhookServer::new(config.server.clone(), dispatcher);

    StructuredLogger::log_info(
        "Scrobbler started successfully",
        None,
        Some(serde_json::json!({
            "listen_address": format!("{}:{}", config.server.listen_host, config.server.listen_port),
            "webhook_path": config.server.webhook_path,
            "client_id": config.anilist.client_id,
            "token_delivery": config.webhook.token_delivery,
            "owner_only": config.webhook.owner_only,
        })),
    );

    sweeper.start();

    // Returns once the shutdown signal has been handled.
    if let Err(e) = webhook_server.start().await {
        StructuredLogger::log_error(&format!("Scrobble server error: {}", e), None);
    }

    if let Err(e) = webhook_server.shutdown().await {
        StructuredLogger::log_error(&format!("Error during server shutdown: {}", e), None);
    }
    sweeper.stop();

    StructuredLogger::log_info("Scrobbler stopped", None, None);

    Ok(())
}
