//! Market data provider interface.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::DailyBar;

/// Daily series, oldest first, or the reason it could not be fetched.
pub type FetchResult = Result<Vec<DailyBar>, FetchError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("Alpha Vantage API Key is not configured correctly on the server.")]
    MissingApiKey,

    #[error("Invalid Alpha Vantage API Key configured on the server.")]
    InvalidApiKey,

    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Rate limit or other informational refusal, carrying the provider's message.
    #[error("{0}")]
    RateLimited(String),

    #[error("Not enough data ({actual})")]
    NotEnoughData { actual: usize, required: usize },

    #[error("Stock API request timed out")]
    Timeout,

    #[error("Network error connecting to stock API")]
    Network(String),

    #[error("Internal error processing stock data")]
    Malformed(String),
}

pub const MAX_SYMBOL_LEN: usize = 20;

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Recent daily OHLCV records for `symbol`, oldest first.
    async fn daily_series(&self, symbol: &str) -> FetchResult;
}

/// Symbols are 1-20 characters of letters, digits, `.` or `-`.
///
/// Exchange suffixes such as `RELIANCE.BSE` are part of the symbol.
pub fn validate_symbol(symbol: &str) -> Result<(), FetchError> {
    let valid = !symbol.is_empty()
        && symbol.len() <= MAX_SYMBOL_LEN
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(FetchError::InvalidSymbol(symbol.to_string()))
    }
}
