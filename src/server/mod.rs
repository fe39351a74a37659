pub mod handler;
pub mod routes;

use crate::adapters::cache::MemorySessionCache;
use crate::adapters::catalog::StaticCatalog;
use crate::adapters::gemini::GeminiItemSource;
use crate::core::engine::BingoEngine;
use crate::core::ConfigProvider;
use crate::utils::error::{BingoError, Result};
use std::net::SocketAddr;
use std::sync::Arc;

pub use routes::router;

/// Wire the catalog, upstream client and session cache into an engine.
pub fn build_engine<C: ConfigProvider + ?Sized>(config: &C) -> Result<BingoEngine> {
    let catalog = StaticCatalog::from_file(config.catalog_path())?;
    let generated = GeminiItemSource::from_config(config)?;
    if config.api_key().is_none() {
        tracing::warn!("⚠️ No upstream API key configured; custom topics may be rejected");
    }

    Ok(BingoEngine::new(
        Arc::new(catalog),
        Arc::new(generated),
        Arc::new(MemorySessionCache::new()),
    )
    .with_max_cards(config.max_cards()))
}

/// Serve until Ctrl-C.
pub async fn serve(bind: &str, engine: BingoEngine) -> Result<()> {
    let addr: SocketAddr = bind.parse().map_err(|e| BingoError::InvalidConfigValueError {
        field: "server.bind".to_string(),
        value: bind.to_string(),
        reason: format!("{}", e),
    })?;

    let app = router(Arc::new(engine));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🚀 Bingo service listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("❌ Failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("👋 Bingo service shutting down");
        })
        .await?;

    Ok(())
}
