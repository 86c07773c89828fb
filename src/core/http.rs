//! HTTP endpoint server using Axum

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

use crate::config::{ServiceConfig, StatusInfo};
use crate::inference::{InferencePipeline, PipelineError};
use crate::metrics::Metrics;
use crate::models::PricePoint;
use crate::services::{FetchError, MarketDataProvider};

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    /// `None` when the model or scaler failed to load at startup.
    pub pipeline: Option<Arc<InferencePipeline>>,
    pub market_data: Arc<dyn MarketDataProvider>,
    pub status: StatusInfo,
    pub template_dir: PathBuf,
    pub static_dir: PathBuf,
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
    pub reason: Option<String>,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
            reason: None,
        }
    }
}

impl HealthStatus {
    pub fn degraded(reason: impl Into<String>) -> Self {
        Self {
            status: "degraded".to_string(),
            reason: Some(reason.into()),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    let code = if health.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let mut body = json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "trendcast-inference"
    });
    if let Some(reason) = &health.reason {
        body["reason"] = json!(reason);
    }
    (code, Json(body))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();

    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();

    state.metrics.http_requests_in_flight.dec();
    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

fn error_body(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

/// Serve the front end once the model is ready.
async fn index(State(state): State<AppState>) -> Response {
    if state.pipeline.is_none() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error: Model or scaler failed to load on the server. Check deployment logs.",
        )
            .into_response();
    }

    let path = state.template_dir.join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            error!(error = %e, path = %path.display(), "Failed to read index template");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error: front end template missing").into_response()
        }
    }
}

pub fn fetch_error_status(e: &FetchError) -> StatusCode {
    match e {
        FetchError::MissingApiKey | FetchError::InvalidApiKey | FetchError::Malformed(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        FetchError::InvalidSymbol(_) | FetchError::NotEnoughData { .. } => StatusCode::BAD_REQUEST,
        FetchError::RateLimited(_) => StatusCode::SERVICE_UNAVAILABLE,
        FetchError::Timeout | FetchError::Network(_) => StatusCode::GATEWAY_TIMEOUT,
    }
}

fn fetch_outcome(e: &FetchError) -> &'static str {
    match e {
        FetchError::MissingApiKey | FetchError::InvalidApiKey => "misconfigured",
        FetchError::InvalidSymbol(_) => "invalid_symbol",
        FetchError::RateLimited(_) => "rate_limited",
        FetchError::NotEnoughData { .. } => "not_enough_data",
        FetchError::Timeout => "timeout",
        FetchError::Network(_) => "network",
        FetchError::Malformed(_) => "malformed",
    }
}

/// Proxy the daily series for a symbol.
async fn stock_data(State(state): State<AppState>, Path(symbol): Path<String>) -> Response {
    match state.market_data.daily_series(&symbol).await {
        Ok(bars) => {
            state
                .metrics
                .market_data_fetches_total
                .with_label_values(&["ok"])
                .inc();
            Json(bars).into_response()
        }
        Err(e) => {
            state
                .metrics
                .market_data_fetches_total
                .with_label_values(&[fetch_outcome(&e)])
                .inc();
            warn!(symbol = %symbol, error = ?e, "Stock data fetch failed");
            error_body(fetch_error_status(&e), e.to_string())
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub prices: Vec<PricePoint>,
}

pub fn pipeline_error_status(e: &PipelineError) -> StatusCode {
    match e {
        PipelineError::InsufficientData { .. } => StatusCode::BAD_REQUEST,
        PipelineError::PreprocessingFailure(_)
        | PipelineError::Inference(_)
        | PipelineError::InvalidResult(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn predict(State(state): State<AppState>, Json(request): Json<PredictRequest>) -> Response {
    let Some(pipeline) = state.pipeline.clone() else {
        state
            .metrics
            .predictions_total
            .with_label_values(&["not_ready"])
            .inc();
        return error_body(StatusCode::SERVICE_UNAVAILABLE, "Model/Scaler not loaded");
    };

    let prices = request.prices;
    let outcome = tokio::task::spawn_blocking(move || pipeline.run(&prices)).await;

    match outcome {
        Ok(Ok(result)) => {
            state
                .metrics
                .predictions_total
                .with_label_values(&["ok"])
                .inc();
            Json(result).into_response()
        }
        Ok(Err(e)) => {
            state
                .metrics
                .predictions_total
                .with_label_values(&[e.kind()])
                .inc();
            warn!(kind = e.kind(), error = %e, "Prediction rejected");
            let body = json!({ "error": e.to_string(), "kind": e.kind() });
            (pipeline_error_status(&e), Json(body)).into_response()
        }
        Err(e) => {
            state
                .metrics
                .predictions_total
                .with_label_values(&["inference_error"])
                .inc();
            error!(error = %e, "Prediction task failed");
            error_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Prediction error: {}", e),
            )
        }
    }
}

async fn status(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "model_version": state.status.model_version,
        "next_retraining": state.status.next_retraining
    }))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/status", get(status))
        .route("/stockdata/{symbol}", get(stock_data))
        .route("/predict", post(predict))
        .nest_service("/static", ServeDir::new(state.static_dir.clone()))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(
    config: ServiceConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let state = crate::core::bootstrap::build_state(&config)?;
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    info!(port = config.port, "HTTP server listening on port {}", config.port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        config.port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
