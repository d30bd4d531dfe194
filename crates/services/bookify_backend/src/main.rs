// File: services/bookify_backend/src/main.rs
mod app;
mod doc;

use bookify_common::logging;
use bookify_config::load_config;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Arc::new(load_config()?);
    // Flushes the log file writer on shutdown.
    let _log_guard = logging::init_from_config(&config.logging);

    let app = logging::log_result(
        app::build_app(config.clone()).await,
        "Application routes assembled",
        "Failed to assemble application",
    )?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
