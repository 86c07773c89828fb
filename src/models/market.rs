use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::prediction::PricePoint;

/// One trading day as returned to the front end.
///
/// A day whose provider record could not be parsed keeps its date and carries
/// `None` in every numeric field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    #[serde(rename = "t")]
    pub date: NaiveDate,
    #[serde(rename = "o")]
    pub open: Option<f64>,
    #[serde(rename = "h")]
    pub high: Option<f64>,
    #[serde(rename = "l")]
    pub low: Option<f64>,
    #[serde(rename = "c")]
    pub close: Option<f64>,
    #[serde(rename = "v")]
    pub volume: Option<f64>,
}

impl DailyBar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close: Some(close),
            volume: Some(volume),
        }
    }

    pub fn missing(date: NaiveDate) -> Self {
        Self {
            date,
            open: None,
            high: None,
            low: None,
            close: None,
            volume: None,
        }
    }
}

/// Closing price column of a daily series, oldest first, gaps preserved.
pub fn closing_prices(bars: &[DailyBar]) -> Vec<PricePoint> {
    bars.iter().map(|bar| bar.close).collect()
}
