mod api_doc;
mod app;
mod config;
mod error;
mod handlers;
mod memory;
mod models;
mod post;
mod routes;
mod spanner;
mod state;
mod store;

use anyhow::Context;
use config::{Config, StoreBackend};
use memory::InMemoryPostTable;
use spanner::SpannerClient;
use state::AppState;
use std::sync::Arc;
use store::{PostStore, PostTable};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    tracing::info!("rust-spanner-posts starting");

    let config = Config::from_env()?;
    config.log_startup();

    // One table handle for the whole process, shared by every request
    let table: Arc<dyn PostTable> = match (config.store_backend, &config.spanner) {
        (StoreBackend::Spanner, Some(spanner_config)) => {
            Arc::new(SpannerClient::from_config(spanner_config).await?)
        }
        (StoreBackend::Spanner, None) => {
            anyhow::bail!("Spanner backend selected without Spanner configuration")
        }
        (StoreBackend::Memory, _) => {
            tracing::warn!("Using in-memory post table, data is lost on restart");
            Arc::new(InMemoryPostTable::new())
        }
    };

    let state = AppState {
        posts: PostStore::new(table),
    };
    let app = app::router(state);

    let addr = format!("{}:{}", config.service_host, config.service_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("rust-spanner-posts stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
