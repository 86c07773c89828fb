//! Alpha Vantage daily time series provider.

pub mod client;
pub mod messages;

pub use client::{AlphaVantageClient, DEFAULT_BASE_URL};
pub use messages::{parse_daily_series, DailySeriesResponse, MIN_SERIES_DAYS, SERIES_WINDOW};
