#![deny(unused_crate_dependencies)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

mod config;
mod error;
mod fetch;
mod parse;
mod refresh;
mod stage;
mod store;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{Method, StatusCode},
    routing::{on, MethodFilter},
    Json, Router,
};
use futures_locks::Mutex;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
};

use crate::{config::Config, fetch::make_client, refresh::Refresher, store::Store};

pub use error::{Error, Result};

#[cfg(all(target_env = "musl", target_pointer_width = "64"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Runs one full refresh. Requests arriving during a refresh wait for it to finish.
async fn update_database(State(refresher): State<Arc<Mutex<Refresher>>>) -> (StatusCode, Json<Value>) {
    let mut refresher = refresher.lock().await;
    match refresher.refresh().await {
        Ok(report) => {
            match serde_json::to_string(&report) {
                Ok(report) => log::info!("Refresh report: {report}"),
                Err(e) => log::warn!("Could not serialize refresh report: {e}"),
            }
            (
                StatusCode::OK,
                Json(json!({ "message": "Successfully updated database" })),
            )
        }
        Err(e) => {
            log::error!("Error updating database: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal Server Error" })),
            )
        }
    }
}

fn app(refresher: Refresher) -> Router {
    let compression_layer: CompressionLayer = CompressionLayer::new()
        .br(true)
        .deflate(true)
        .gzip(true)
        .zstd(true);
    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::PUT])
        .allow_origin(Any);

    Router::new()
        .route(
            "/update-database",
            on(MethodFilter::GET.or(MethodFilter::PUT), update_database),
        )
        .with_state(Arc::new(Mutex::new(refresher)))
        .layer(cors_layer)
        .layer(compression_layer)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for ctrl-c: {e}");
    }
    log::info!("shutting down");
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> core::result::Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let config = Config::from_env()?;
    let client = make_client(config.accept_invalid_certs)?;
    let store = Store::open(&config.store, &client).await?;
    log::info!("using store {store:?}");
    let refresher = Refresher::new(&config, client, store);

    let listener = TcpListener::bind(config.addr)
        .await
        .map_err(|e| Error::config_error(format!("failed to listen on {}: {e}", config.addr)))?;
    log::info!("listening on http://{}", config.addr);
    axum::serve(listener, app(refresher))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
