use std::sync::Arc;

use movie_catalog_api::{
    config::Config,
    db::{create_pool, MemoryStore, PostgresStore, ResponseCache, Store},
    routes::{create_router, AppState},
    services::providers::TmdbProvider,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("movie_catalog_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn Store> = match &config.database_url {
        Some(url) => Arc::new(PostgresStore::new(create_pool(url).await?)),
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let provider = TmdbProvider::new(
        Arc::new(ResponseCache::new()),
        config.tmdb_api_key.clone(),
        &config.tmdb_api_url,
        config.cache_ttl(),
        config.provider_timeout(),
    )?;

    let state = Arc::new(AppState {
        store,
        provider: Arc::new(provider),
    });

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        cache_ttl_secs = config.cache_ttl_secs,
        "Server running"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
