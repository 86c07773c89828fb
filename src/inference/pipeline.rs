//! Request-scoped inference pipeline.
//!
//! validate raw length -> clean -> check valid length -> normalize -> predict -> estimate accuracy.
//! Every failure is returned as a [`PipelineError`]; nothing is retried.

use tracing::{debug, info, warn};

use super::accuracy::AccuracyPolicy;
use super::cleaner::clean_series;
use super::error::{DataStage, PipelineError};
use super::model::ModelArtifacts;
use super::predictor::Predictor;
use super::window::{WindowNormalizer, WindowOrigin};
use crate::models::{PredictionResult, PricePoint};

pub const DEFAULT_TIMESTEPS: usize = 30;
pub const DEFAULT_MIN_RAW_POINTS: usize = 30;
pub const DEFAULT_MIN_VALID_POINTS: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Window length shared by preprocessing and the model input shape.
    pub timesteps: usize,
    pub min_raw_points: usize,
    pub min_valid_points: usize,
    pub accuracy: AccuracyPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            timesteps: DEFAULT_TIMESTEPS,
            min_raw_points: DEFAULT_MIN_RAW_POINTS,
            min_valid_points: DEFAULT_MIN_VALID_POINTS,
            accuracy: AccuracyPolicy::Comparative,
        }
    }
}

/// Stateless orchestrator holding shared, read-only artifacts.
#[derive(Clone)]
pub struct InferencePipeline {
    config: PipelineConfig,
    normalizer: WindowNormalizer,
    artifacts: ModelArtifacts,
}

impl InferencePipeline {
    pub fn new(config: PipelineConfig, artifacts: ModelArtifacts) -> Self {
        let normalizer = WindowNormalizer::new(config.timesteps);
        Self {
            config,
            normalizer,
            artifacts,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn run(&self, prices: &[PricePoint]) -> Result<PredictionResult, PipelineError> {
        if prices.len() < self.config.min_raw_points {
            return Err(PipelineError::InsufficientData {
                stage: DataStage::Raw,
                actual: prices.len(),
                required: self.config.min_raw_points,
            });
        }

        let cleaned = clean_series(prices);
        debug!(
            raw = prices.len(),
            valid = cleaned.len(),
            "Cleaned price series"
        );

        if !cleaned.is_empty() && cleaned.len() < self.config.min_valid_points {
            return Err(PipelineError::InsufficientData {
                stage: DataStage::Valid,
                actual: cleaned.len(),
                required: self.config.min_valid_points,
            });
        }

        let normalized = self
            .normalizer
            .normalize(&cleaned, self.artifacts.scaler.as_ref());
        match normalized.origin {
            WindowOrigin::EmptyInput => {
                return Err(PipelineError::PreprocessingFailure(
                    "no valid price observations".to_string(),
                ));
            }
            WindowOrigin::ShapeFallback => {
                return Err(PipelineError::PreprocessingFailure(
                    "scaler produced a malformed window".to_string(),
                ));
            }
            WindowOrigin::Observed if normalized.is_all_zero() => {
                warn!(valid = cleaned.len(), "Scaled window is uniformly zero");
                return Err(PipelineError::PreprocessingFailure(
                    "scaled window is uniformly zero".to_string(),
                ));
            }
            WindowOrigin::Observed => {}
        }

        let prediction = Predictor::predict(&normalized.tensor, self.artifacts.model.as_ref())?;
        // accuracy looks at the caller's series as sent, not the cleaned copy
        let accuracy = self.config.accuracy.estimate(prices, prediction.label);
        let result = PredictionResult::new(prediction.label, prediction.confidence, accuracy)?;

        info!(
            label = %result.label(),
            confidence = result.confidence(),
            accuracy = result.accuracy(),
            valid_points = cleaned.len(),
            "Prediction complete"
        );
        Ok(result)
    }
}
