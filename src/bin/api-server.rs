//! Trendcast API Server
//!
//! Serves directional predictions from the pretrained sequence model and
//! proxies daily series from Alpha Vantage for the front end.
//! Requests share the read-only model artifacts, so the service scales horizontally.

use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};
use trendcast::config::ServiceConfig;
use trendcast::core::http::start_server;
use trendcast::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let config = ServiceConfig::from_env().map_err(|e| {
        error!(error = %e, "Invalid configuration");
        e
    })?;
    let port = config.port;

    let env = trendcast::config::get_environment();
    info!("Starting Trendcast API Server");
    info!(environment = %env, "Environment");
    info!(
        model = %config.artifacts.model.display(),
        scaler = %config.artifacts.scaler.display(),
        timesteps = config.pipeline.timesteps,
        "Model artifacts"
    );
    info!(port = port, "HTTP Server: http://0.0.0.0:{}", port);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(config).await {
            error!(error = %e, "HTTP server error");
        }
    });

    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
