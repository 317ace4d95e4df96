use std::sync::Arc;

use anyhow::Context;
use common::storage::filesystem::FilesystemImageStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

use server::config::AppConfig;
use server::state::AppState;
use server::{build_router, database, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if config.auth.admin_password.is_empty() {
        tracing::warn!("No admin password configured; admin login is disabled");
    }

    let db = database::init_db(&config.database)
        .await
        .context("Failed to initialize database")?;
    seed::seed_counters(&db)
        .await
        .context("Failed to seed counters")?;
    seed::ensure_indexes(&db)
        .await
        .context("Failed to create indexes")?;

    let images = FilesystemImageStore::new(config.storage.data_dir.clone())
        .await
        .with_context(|| format!("Failed to open image store at {:?}", config.storage.data_dir))?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        db,
        config: Arc::new(config),
        images: Arc::new(images),
    };

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
