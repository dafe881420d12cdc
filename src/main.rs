//! Bookshelf backend entry point
//!
//! All catalog operations are exposed via GraphQL at /graphql.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookshelf::AppState;
use bookshelf::api;
use bookshelf::config::Config;
use bookshelf::db::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bookshelf=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    tracing::info!("Starting Bookshelf backend");

    let config = Arc::new(Config::from_env()?);
    tracing::info!("Configuration loaded");

    if let Some(dir) = config
        .database_url
        .strip_prefix("sqlite://")
        .and_then(|path| std::path::Path::new(path).parent())
        .filter(|dir| !dir.as_os_str().is_empty())
    {
        std::fs::create_dir_all(dir)?;
    }

    let db = Database::connect(&config.database_url, config.database_max_connections)
        .await?;
    tracing::info!("Database connected");

    let state = AppState::new(config.clone(), db);
    tracing::info!("GraphQL schema built");

    let app = api::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);
    tracing::info!(
        "GraphQL playground: http://{}:{}/graphql",
        config.host.as_deref().unwrap_or("localhost"),
        config.port
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
