//! Alpha Vantage REST client.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info};

use super::messages::{parse_daily_series, MIN_SERIES_DAYS, SERIES_WINDOW};
use crate::services::market_data::{validate_symbol, FetchError, FetchResult, MarketDataProvider};

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct AlphaVantageClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl AlphaVantageClient {
    /// Client with the default 10 second request timeout.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_client(base_url, api_key, http))
    }

    pub fn with_client(
        base_url: impl Into<String>,
        api_key: Option<String>,
        http: reqwest::Client,
    ) -> Self {
        let api_key = api_key.filter(|key| !key.trim().is_empty());
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

fn map_transport_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        error!("Alpha Vantage request timed out");
        FetchError::Timeout
    } else {
        error!(error = %e, "Alpha Vantage network error");
        FetchError::Network(e.to_string())
    }
}

#[async_trait]
impl MarketDataProvider for AlphaVantageClient {
    async fn daily_series(&self, symbol: &str) -> FetchResult {
        let api_key = self.api_key.as_deref().ok_or(FetchError::MissingApiKey)?;
        validate_symbol(symbol)?;

        debug!(symbol = %symbol, "Fetching Alpha Vantage daily series");
        let response = self
            .http
            .get(format!("{}/query", self.base_url))
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol),
                ("outputsize", "compact"),
                ("apikey", api_key),
            ])
            .send()
            .await
            .map_err(map_transport_error)?
            .error_for_status()
            .map_err(map_transport_error)?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| FetchError::Malformed(e.to_string()))?;

        let bars = parse_daily_series(&body, SERIES_WINDOW, MIN_SERIES_DAYS)?;
        info!(symbol = %symbol, points = bars.len(), "Alpha Vantage fetch OK");
        Ok(bars)
    }
}
