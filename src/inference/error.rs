//! Error taxonomy for the inference core.

use std::path::PathBuf;
use thiserror::Error;

use crate::models::RecordError;

/// Startup-only failures. A service in this state must not accept predictions.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("{artifact} artifact not found at {path}")]
    ArtifactMissing { artifact: &'static str, path: PathBuf },

    #[error("failed to read scaler artifact {path}: {reason}")]
    ScalerUnreadable { path: PathBuf, reason: String },

    #[error("invalid scaler artifact: {0}")]
    InvalidScaler(#[from] ScalerError),

    #[error("failed to load model from {path}: {reason}")]
    ModelUnloadable { path: PathBuf, reason: String },

    #[error("model rejected input shape (1, {timesteps}, 1): {reason}")]
    ShapeMismatch { timesteps: usize, reason: String },

    #[error("invalid value for {key}: {value}")]
    InvalidSetting { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScalerError {
    #[error("scaler was fitted on {0} features, expected exactly 1")]
    FeatureCount(usize),

    #[error("scaler parameter {0} is not finite or non-positive")]
    BadParameter(&'static str),

    #[error("scaler output length {actual} does not match input length {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Failures of the model forward pass.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("model session is unavailable")]
    ModelUnavailable,

    #[error("forward pass failed: {0}")]
    ForwardPass(String),

    #[error("model returned malformed output: {0}")]
    MalformedOutput(String),
}

/// Per-request failures reported at the pipeline boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("Not enough data: {actual} {stage} points, need at least {required}")]
    InsufficientData {
        stage: DataStage,
        actual: usize,
        required: usize,
    },

    #[error("Data preprocessing failed: {0}")]
    PreprocessingFailure(String),

    #[error("Prediction error: {0}")]
    Inference(#[from] InferenceError),

    #[error("Prediction error: {0}")]
    InvalidResult(#[from] RecordError),
}

impl PipelineError {
    /// Stable identifier used in API error bodies and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::InsufficientData { .. } => "insufficient_data",
            PipelineError::PreprocessingFailure(_) => "preprocessing_failure",
            PipelineError::Inference(_) | PipelineError::InvalidResult(_) => "inference_error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataStage {
    Raw,
    Valid,
}

impl std::fmt::Display for DataStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataStage::Raw => f.write_str("raw"),
            DataStage::Valid => f.write_str("valid"),
        }
    }
}
