//! tooldepot service entry point.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tooldepot::api::{build_app, AppState};
use tooldepot::config::AppConfig;
use tooldepot::domain::directory::ProductDirectory;
use tooldepot::store::{self, CartStore, CatalogStore};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(AppConfig::from_env()?);
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let pool = store::connect_pool(&config.database_url, config.db_max_connections).await?;
    store::run_migrations(&pool).await?;

    let nats = match &config.nats_url {
        Some(url) => match async_nats::connect(url.as_str()).await {
            Ok(client) => Some(client),
            Err(error) => {
                tracing::warn!(%error, "NATS unavailable, catalog events disabled");
                None
            }
        },
        None => None,
    };

    let state = AppState {
        catalog: CatalogStore::new(pool.clone()),
        carts: CartStore::new(pool),
        directory: Arc::new(RwLock::new(ProductDirectory::new())),
        config: Arc::clone(&config),
        nats,
    };

    // Initial catalog load; an unreachable store leaves the directory empty
    // and the service keeps serving.
    match state.reload_directory().await {
        Ok(count) => tracing::info!(products = count, "catalog loaded"),
        Err(error) => tracing::error!(%error, "could not load products"),
    }

    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("tooldepot listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
