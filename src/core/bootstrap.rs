//! Startup wiring: load artifacts once and build the shared application state.

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::config::ServiceConfig;
use crate::core::http::{AppState, HealthStatus};
use crate::inference::{ConfigurationError, InferencePipeline, ModelArtifacts};
use crate::metrics::Metrics;
use crate::services::AlphaVantageClient;

/// Load the model and scaler and assemble the pipeline.
pub fn load_pipeline(config: &ServiceConfig) -> Result<InferencePipeline, ConfigurationError> {
    let artifacts = ModelArtifacts::load(&config.artifacts, config.pipeline.timesteps)?;
    Ok(InferencePipeline::new(config.pipeline.clone(), artifacts))
}

/// Build the application state.
///
/// Missing or unusable artifacts do not abort startup: the service comes up
/// degraded, reports it on `/health`, and refuses prediction requests.
pub fn build_state(
    config: &ServiceConfig,
) -> Result<AppState, Box<dyn std::error::Error + Send + Sync>> {
    let metrics = Arc::new(Metrics::new()?);

    let (pipeline, health) = match load_pipeline(config) {
        Ok(pipeline) => {
            info!(
                timesteps = config.pipeline.timesteps,
                accuracy_mode = config.pipeline.accuracy.mode_name(),
                "Inference pipeline ready"
            );
            (Some(Arc::new(pipeline)), HealthStatus::default())
        }
        Err(e) => {
            error!(error = %e, "Model artifacts unavailable, starting in degraded mode");
            (None, HealthStatus::degraded(e.to_string()))
        }
    };

    if config.alpha_vantage_key.is_none() {
        warn!("ALPHA_VANTAGE_KEY not set, stock data requests will fail");
    } else {
        info!("Alpha Vantage API key loaded from environment");
    }
    let market_data = AlphaVantageClient::new(
        config.alpha_vantage_base_url.clone(),
        config.alpha_vantage_key.clone(),
    )?;

    Ok(AppState {
        health: Arc::new(RwLock::new(health)),
        metrics,
        start_time: Arc::new(Instant::now()),
        pipeline,
        market_data: Arc::new(market_data),
        status: config.status.clone(),
        template_dir: config.template_dir.clone(),
        static_dir: config.static_dir.clone(),
    })
}
