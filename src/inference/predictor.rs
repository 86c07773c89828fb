//! Model invocation and label/confidence calibration.

use tracing::debug;

use super::error::InferenceError;
use super::model::SequenceModel;
use super::window::ScaledTensor;
use crate::models::PredictionLabel;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub label: PredictionLabel,
    /// Certainty in `label`, as a percentage rounded to one decimal.
    pub confidence: f64,
    /// Raw bullish probability returned by the model.
    pub probability: f64,
}

impl Prediction {
    pub fn from_probability(prob: f64) -> Self {
        let label = PredictionLabel::from_probability(prob);
        let certainty = match label {
            PredictionLabel::Bullish => prob,
            PredictionLabel::Bearish => 1.0 - prob,
        };
        Self {
            label,
            confidence: round_one_decimal(certainty * 100.0),
            probability: prob,
        }
    }
}

/// Exact halves round to even, so `56.25` becomes `56.2`.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

pub struct Predictor;

impl Predictor {
    /// Run the forward pass and convert the probability into a labelled prediction.
    pub fn predict(
        tensor: &ScaledTensor,
        model: &dyn SequenceModel,
    ) -> Result<Prediction, InferenceError> {
        let prob = model.forward(tensor)?;
        if !prob.is_finite() || !(0.0..=1.0).contains(&prob) {
            return Err(InferenceError::MalformedOutput(format!(
                "probability {} outside [0, 1]",
                prob
            )));
        }

        let prediction = Prediction::from_probability(prob);
        debug!(
            model = model.name(),
            probability = prob,
            label = %prediction.label,
            confidence = prediction.confidence,
            "Model prediction"
        );
        Ok(prediction)
    }
}
