//! Post-hoc accuracy estimate for a prediction.

use super::cleaner::clean_series;
use crate::models::{PredictionLabel, PricePoint};

/// Accuracy policy, chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AccuracyPolicy {
    #[default]
    /// 100.0 when the label matches the last realized move, else 0.0.
    Comparative,
    /// Constant estimate returned for every prediction.
    Fixed(f64),
}

impl AccuracyPolicy {
    pub fn estimate(&self, prices: &[PricePoint], predicted: PredictionLabel) -> f64 {
        match self {
            AccuracyPolicy::Fixed(value) => *value,
            AccuracyPolicy::Comparative => match realized_direction(prices) {
                Some(actual) if actual == predicted => 100.0,
                _ => 0.0,
            },
        }
    }

    pub fn mode_name(&self) -> &'static str {
        match self {
            AccuracyPolicy::Comparative => "comparative",
            AccuracyPolicy::Fixed(_) => "fixed",
        }
    }
}

/// Direction of the last step between the two most recent valid prices.
/// A flat last step counts as Bearish.
pub fn realized_direction(prices: &[PricePoint]) -> Option<PredictionLabel> {
    let cleaned = clean_series(prices);
    match cleaned.as_slice() {
        [.., previous, last] if last > previous => Some(PredictionLabel::Bullish),
        [.., _, _] => Some(PredictionLabel::Bearish),
        _ => None,
    }
}
