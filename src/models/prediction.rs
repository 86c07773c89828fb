use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A single closing price observation. `None` marks a missing or invalid day.
pub type PricePoint = Option<f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PredictionLabel {
    Bullish,
    Bearish,
}

impl PredictionLabel {
    /// Label chosen for a bullish probability. Ties go to Bullish.
    pub fn from_probability(prob: f64) -> Self {
        if prob >= 0.5 {
            PredictionLabel::Bullish
        } else {
            PredictionLabel::Bearish
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionLabel::Bullish => "Bullish",
            PredictionLabel::Bearish => "Bearish",
        }
    }
}

impl fmt::Display for PredictionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("confidence {0} outside [0, 100]")]
    ConfidenceOutOfRange(f64),

    #[error("accuracy {0} outside [0, 100]")]
    AccuracyOutOfRange(f64),
}

/// Outcome of one prediction request.
///
/// Fields are only reachable through [`PredictionResult::new`], which rejects
/// percentages outside `[0, 100]` (including NaN).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    label: PredictionLabel,
    confidence: f64,
    accuracy: f64,
}

impl PredictionResult {
    pub fn new(label: PredictionLabel, confidence: f64, accuracy: f64) -> Result<Self, RecordError> {
        if !(0.0..=100.0).contains(&confidence) {
            return Err(RecordError::ConfidenceOutOfRange(confidence));
        }
        if !(0.0..=100.0).contains(&accuracy) {
            return Err(RecordError::AccuracyOutOfRange(accuracy));
        }
        Ok(Self {
            label,
            confidence,
            accuracy,
        })
    }

    pub fn label(&self) -> PredictionLabel {
        self.label
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }
}
