//! Unit tests for Alpha Vantage response normalization

use chrono::NaiveDate;
use serde_json::{json, Map, Value};
use trendcast::models::closing_prices;
use trendcast::services::alpha_vantage::{parse_daily_series, MIN_SERIES_DAYS, SERIES_WINDOW};
use trendcast::services::market_data::validate_symbol;
use trendcast::services::{AlphaVantageClient, FetchError, MarketDataProvider};

fn daily_body(days: usize) -> Value {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut series = Map::new();
    for i in 0..days {
        let date = start + chrono::Duration::days(i as i64);
        let close = 100.0 + i as f64;
        series.insert(
            date.format("%Y-%m-%d").to_string(),
            json!({
                "1. open": format!("{:.4}", close - 1.0),
                "2. high": format!("{:.4}", close + 1.0),
                "3. low": format!("{:.4}", close - 2.0),
                "4. close": format!("{:.4}", close),
                "5. volume": "1000000"
            }),
        );
    }
    json!({
        "Meta Data": { "2. Symbol": "IBM" },
        "Time Series (Daily)": series
    })
}

#[test]
fn test_parse_keeps_last_sixty_days_oldest_first() {
    let bars = parse_daily_series(&daily_body(100), SERIES_WINDOW, MIN_SERIES_DAYS).unwrap();
    assert_eq!(bars.len(), 60);
    assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 2, 10).unwrap());
    assert_eq!(bars[0].close, Some(140.0));
    assert_eq!(bars[59].close, Some(199.0));
    assert!(bars.windows(2).all(|w| w[0].date < w[1].date));
}

#[test]
fn test_parse_marks_malformed_day_missing() {
    let mut body = daily_body(40);
    body["Time Series (Daily)"]["2024-01-05"]["4. close"] = json!("n/a");

    let bars = parse_daily_series(&body, SERIES_WINDOW, MIN_SERIES_DAYS).unwrap();
    let day = &bars[4];
    assert_eq!(day.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
    assert_eq!(day.open, None);
    assert_eq!(day.close, None);
    assert_eq!(day.volume, None);

    let closes = closing_prices(&bars);
    assert_eq!(closes.len(), 40);
    assert_eq!(closes.iter().filter(|c| c.is_none()).count(), 1);
}

#[test]
fn test_parse_rejects_short_series() {
    let err = parse_daily_series(&daily_body(20), SERIES_WINDOW, MIN_SERIES_DAYS).unwrap_err();
    assert_eq!(
        err,
        FetchError::NotEnoughData {
            actual: 20,
            required: 35
        }
    );
}

#[test]
fn test_parse_rate_limit_information() {
    let body = json!({ "Information": "Thank you for using Alpha Vantage! Our standard API rate limit is 25 requests per day." });
    let err = parse_daily_series(&body, SERIES_WINDOW, MIN_SERIES_DAYS).unwrap_err();
    assert!(matches!(err, FetchError::RateLimited(ref msg) if msg.contains("rate limit")));
}

#[test]
fn test_parse_invalid_api_key() {
    let body = json!({ "Information": "Invalid API key. Please claim your free API key." });
    let err = parse_daily_series(&body, SERIES_WINDOW, MIN_SERIES_DAYS).unwrap_err();
    assert_eq!(err, FetchError::InvalidApiKey);
}

#[test]
fn test_parse_error_message_is_invalid_symbol() {
    let body = json!({ "Error Message": "Invalid API call. Please retry or visit the documentation." });
    let err = parse_daily_series(&body, SERIES_WINDOW, MIN_SERIES_DAYS).unwrap_err();
    assert!(matches!(err, FetchError::InvalidSymbol(_)));
}

#[test]
fn test_parse_other_error_message_is_provider_issue() {
    let body = json!({ "Error Message": "the parameter apikey is invalid or missing." });
    let err = parse_daily_series(&body, SERIES_WINDOW, MIN_SERIES_DAYS).unwrap_err();
    assert_eq!(
        err,
        FetchError::RateLimited("the parameter apikey is invalid or missing.".to_string())
    );
}

#[test]
fn test_parse_missing_series() {
    let err = parse_daily_series(&json!({}), SERIES_WINDOW, MIN_SERIES_DAYS).unwrap_err();
    assert!(matches!(err, FetchError::RateLimited(_)));
}

#[test]
fn test_validate_symbol() {
    assert!(validate_symbol("IBM").is_ok());
    assert!(validate_symbol("BRK.B").is_ok());
    assert!(validate_symbol("ITC.NS").is_ok());
    assert!(validate_symbol("").is_err());
    assert!(validate_symbol("IBM&apikey=x").is_err());
    assert!(validate_symbol("RELIANCE.BSE").is_ok());
    assert!(validate_symbol("TATAMOTORS.BSE").is_ok());
    assert!(validate_symbol("HDFCBANK.NS").is_ok());
    assert!(validate_symbol("ABCDEFGHIJKLMNOPQRSTU").is_err());
}

#[test]
fn test_client_without_key_fails_before_request() {
    let client = AlphaVantageClient::with_client("http://127.0.0.1:9", None, reqwest::Client::new());
    assert!(!client.has_api_key());

    let result = tokio_test::block_on(client.daily_series("IBM"));
    assert_eq!(result.unwrap_err(), FetchError::MissingApiKey);
}
