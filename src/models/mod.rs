//! Shared data models spanning the inference and API layers.

pub mod market;
pub mod prediction;

pub use market::{closing_prices, DailyBar};
pub use prediction::{PredictionLabel, PredictionResult, PricePoint, RecordError};
