mod api_doc;
mod app;
mod config;
mod error;
mod handlers;
mod models;
mod routes;
mod state;
mod store;

use anyhow::Context;
use config::{Config, StoreBackend};
use state::AppState;
use std::sync::Arc;
use store::{DocumentStore, MemoryStore, SpannerStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("todo_api=info,tower_http=info")),
        )
        .init();

    tracing::info!("todo-api starting");

    let config = Config::from_env()?;
    config.log_startup();
    let config = Arc::new(config);

    match config.store_backend {
        StoreBackend::Spanner => {
            let settings = config
                .spanner
                .as_ref()
                .context("Spanner settings missing for spanner backend")?;
            let spanner = Arc::new(SpannerStore::from_config(settings, &config.todos_collection).await?);

            serve(spanner.clone(), config.clone()).await?;

            // The router and every state clone are gone once serve returns
            match Arc::try_unwrap(spanner) {
                Ok(spanner) => spanner.close().await,
                Err(_) => tracing::warn!("Spanner client still shared at shutdown, not closing"),
            }
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store: todos are lost on exit");
            serve(Arc::new(MemoryStore::new()), config.clone()).await?;
        }
    }

    tracing::info!("todo-api stopped");
    Ok(())
}

async fn serve(store: Arc<dyn DocumentStore>, config: Arc<Config>) -> anyhow::Result<()> {
    let address = config.bind_address();
    let app = app::router(AppState { store, config });

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!("Listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
