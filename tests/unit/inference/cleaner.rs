//! Unit tests for series cleaning

use trendcast::inference::clean_series;

#[test]
fn test_clean_keeps_valid_prices_in_order() {
    let raw = vec![Some(1.0), None, Some(3.0), Some(2.0), None];
    assert_eq!(clean_series(&raw), vec![1.0, 3.0, 2.0]);
}

#[test]
fn test_clean_drops_non_finite_values() {
    let raw = vec![
        Some(f64::NAN),
        Some(5.0),
        Some(f64::INFINITY),
        Some(f64::NEG_INFINITY),
    ];
    assert_eq!(clean_series(&raw), vec![5.0]);
}

#[test]
fn test_clean_all_missing_is_empty() {
    let raw = vec![None; 40];
    assert!(clean_series(&raw).is_empty());
}

#[test]
fn test_clean_empty_input() {
    assert!(clean_series(&[]).is_empty());
}
