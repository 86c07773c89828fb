//! Alpha Vantage response shapes and normalization into [`DailyBar`]s.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::models::DailyBar;
use crate::services::market_data::FetchError;

/// Most recent days kept from a compact response.
pub const SERIES_WINDOW: usize = 60;

/// Fewer days than this cannot feed the front end's indicators.
pub const MIN_SERIES_DAYS: usize = 35;

#[derive(Debug, Deserialize)]
pub struct DailySeriesResponse {
    #[serde(rename = "Time Series (Daily)")]
    pub time_series: Option<BTreeMap<String, Value>>,
    #[serde(rename = "Error Message")]
    pub error_message: Option<String>,
    #[serde(rename = "Information")]
    pub information: Option<String>,
    #[serde(rename = "Note")]
    pub note: Option<String>,
}

/// Turn a raw `TIME_SERIES_DAILY` body into the last `window` days, oldest first.
pub fn parse_daily_series(
    body: &Value,
    window: usize,
    min_days: usize,
) -> Result<Vec<DailyBar>, FetchError> {
    let response: DailySeriesResponse = serde_json::from_value(body.clone())
        .map_err(|e| FetchError::Malformed(e.to_string()))?;

    if let Some(info) = response.information.as_deref() {
        if info.contains("Invalid API key") {
            return Err(FetchError::InvalidApiKey);
        }
    }
    if let Some(message) = response.error_message.as_deref() {
        if message.contains("Invalid API call") {
            warn!(message = %message, "Alpha Vantage rejected symbol");
            return Err(FetchError::InvalidSymbol(message.to_string()));
        }
    }
    if let Some(info) = response
        .information
        .or(response.error_message)
        .or(response.note)
    {
        warn!(message = %info, "Alpha Vantage limit or notice");
        return Err(FetchError::RateLimited(info));
    }

    let series = response.time_series.ok_or_else(|| {
        FetchError::RateLimited("Unknown API issue".to_string())
    })?;

    let days: Vec<(NaiveDate, &Value)> = series
        .iter()
        .filter_map(|(date, day)| match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            Ok(date) => Some((date, day)),
            Err(e) => {
                warn!(date = %date, error = %e, "Skipping series entry with invalid date");
                None
            }
        })
        .collect();

    let start = days.len().saturating_sub(window);
    let recent = &days[start..];
    if recent.len() < min_days {
        return Err(FetchError::NotEnoughData {
            actual: recent.len(),
            required: min_days,
        });
    }

    let bars: Vec<DailyBar> = recent
        .iter()
        .map(|(date, day)| parse_day(*date, day))
        .collect();
    debug!(days = bars.len(), "Parsed daily series");
    Ok(bars)
}

/// A day with any unparseable field becomes a fully missing bar.
fn parse_day(date: NaiveDate, day: &Value) -> DailyBar {
    let field = |key: &str| -> Option<f64> {
        day.get(key)
            .and_then(Value::as_str)
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
    };

    match (
        field("1. open"),
        field("2. high"),
        field("3. low"),
        field("4. close"),
        field("5. volume"),
    ) {
        (Some(open), Some(high), Some(low), Some(close), Some(volume)) => {
            DailyBar::new(date, open, high, low, close, volume)
        }
        _ => {
            debug!(date = %date, "Malformed daily record, marking as missing");
            DailyBar::missing(date)
        }
    }
}
