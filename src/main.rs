use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use comics_api::config::AppConfig;
use comics_api::services::mongo_store::MongoComicStore;
use comics_api::services::store::ComicStore;

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    let store: Arc<dyn ComicStore> = Arc::new(
        MongoComicStore::connect(&config)
            .await
            .context("Failed to initialize MongoDB client")?,
    );

    let launched = comics_api::build_rocket(store.clone()).launch().await;

    // Rocket has shut down (or never started); release the driver either way.
    store.close().await;

    launched.map_err(|e| anyhow::anyhow!("Rocket failed: {}", e))?;
    tracing::info!("Shutdown complete");
    Ok(())
}
