use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use prompthub_server::config::AppConfig;
use prompthub_server::identity::SlackProvider;
use prompthub_server::state::AppState;
use prompthub_server::{build_router, database, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = database::init_db(&config.database)
        .await
        .context("Failed to connect to database")?;
    info!("Database connected");

    seed::ensure_indexes(&db).await?;
    match &config.admin {
        Some(admin) => seed::seed_admin(&db, admin)
            .await
            .context("Failed to seed administrator")?,
        None => warn!("No [admin] section configured; administrator login is unavailable until one is seeded"),
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let state = AppState {
        db,
        identity: Arc::new(SlackProvider::new(config.slack.clone())),
        config,
    };

    let app = build_router(state);

    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
