use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use shukalafiya::api::server::start_server;
use shukalafiya::api::types::ApiContext;
use shukalafiya::config::{self, Config};
use shukalafiya::store::InMemoryStore;
use shukalafiya::upstream::OpenAiChatClient;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let cfg = Config::from_env().unwrap_or_else(|e| {
        tracing::error!("Configuration error: {e}");
        std::process::exit(1);
    });

    let model = OpenAiChatClient::new(&cfg.base_url, &cfg.api_key, &cfg.model)
        .unwrap_or_else(|e| {
            tracing::error!("Upstream client error: {e}");
            std::process::exit(1);
        });

    let ctx = ApiContext::new(Arc::new(model), Arc::new(InMemoryStore::new()));

    let mut server = start_server(ctx, cfg.bind_addr).await.unwrap_or_else(|e| {
        tracing::error!("{e}");
        std::process::exit(1);
    });

    tracing::info!(addr = %server.addr, model = %cfg.model, "Ready");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
    server.shutdown();
    // Give in-flight requests a moment to drain.
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
}
