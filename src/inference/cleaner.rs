//! Series cleaning: drop missing and non-finite observations.

use crate::models::PricePoint;

/// Valid observations in their original order.
pub type CleanedSeries = Vec<f64>;

/// Remove missing, NaN and infinite entries, keeping chronological order.
pub fn clean_series(prices: &[PricePoint]) -> CleanedSeries {
    prices
        .iter()
        .filter_map(|p| p.filter(|v| v.is_finite()))
        .collect()
}
