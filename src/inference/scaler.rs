//! Fitted feature scalers.
//!
//! Scalers are fitted during training and exported as JSON holding the fitted
//! parameters of a single-feature min-max or standard scaler. They are never
//! refitted or mutated at request time.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::{ConfigurationError, ScalerError};

/// Pure column transform applied to a price window before inference.
pub trait Scaler: Send + Sync {
    fn transform(&self, column: &[f64]) -> Result<Vec<f64>, ScalerError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FittedScaler {
    MinMax {
        data_min: Vec<f64>,
        data_max: Vec<f64>,
        #[serde(default = "default_feature_range")]
        feature_range: (f64, f64),
    },
    Standard {
        mean: Vec<f64>,
        scale: Vec<f64>,
    },
}

fn default_feature_range() -> (f64, f64) {
    (0.0, 1.0)
}

impl FittedScaler {
    pub fn min_max(data_min: f64, data_max: f64) -> Self {
        FittedScaler::MinMax {
            data_min: vec![data_min],
            data_max: vec![data_max],
            feature_range: default_feature_range(),
        }
    }

    pub fn standard(mean: f64, scale: f64) -> Self {
        FittedScaler::Standard {
            mean: vec![mean],
            scale: vec![scale],
        }
    }

    /// Parse and validate a JSON scaler export.
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        Self::parse(json, Path::new("<inline>"))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigurationError> {
        if !path.exists() {
            return Err(ConfigurationError::ArtifactMissing {
                artifact: "scaler",
                path: path.to_path_buf(),
            });
        }
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigurationError::ScalerUnreadable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Self::parse(&contents, path)
    }

    fn parse(json: &str, origin: &Path) -> Result<Self, ConfigurationError> {
        let scaler: FittedScaler =
            serde_json::from_str(json).map_err(|e| ConfigurationError::ScalerUnreadable {
                path: origin.to_path_buf(),
                reason: e.to_string(),
            })?;
        scaler.validate()?;
        Ok(scaler)
    }

    /// Check that the scaler was fitted on exactly one feature with usable parameters.
    pub fn validate(&self) -> Result<(), ScalerError> {
        match self {
            FittedScaler::MinMax {
                data_min,
                data_max,
                feature_range,
            } => {
                if data_min.len() != 1 || data_max.len() != 1 {
                    return Err(ScalerError::FeatureCount(data_min.len().max(data_max.len())));
                }
                if !data_min[0].is_finite() || !data_max[0].is_finite() {
                    return Err(ScalerError::BadParameter("data_min/data_max"));
                }
                if !feature_range.0.is_finite()
                    || !feature_range.1.is_finite()
                    || feature_range.1 <= feature_range.0
                {
                    return Err(ScalerError::BadParameter("feature_range"));
                }
            }
            FittedScaler::Standard { mean, scale } => {
                if mean.len() != 1 || scale.len() != 1 {
                    return Err(ScalerError::FeatureCount(mean.len().max(scale.len())));
                }
                if !mean[0].is_finite() || !scale[0].is_finite() || scale[0] < 0.0 {
                    return Err(ScalerError::BadParameter("mean/scale"));
                }
            }
        }
        Ok(())
    }
}

impl Scaler for FittedScaler {
    fn transform(&self, column: &[f64]) -> Result<Vec<f64>, ScalerError> {
        match self {
            FittedScaler::MinMax {
                data_min,
                data_max,
                feature_range,
            } => {
                let (lo, hi) = (data_min[0], data_max[0]);
                // constant features map with unit range, as scikit-learn does
                let range = if hi - lo == 0.0 { 1.0 } else { hi - lo };
                let (out_lo, out_hi) = *feature_range;
                Ok(column
                    .iter()
                    .map(|x| (x - lo) / range * (out_hi - out_lo) + out_lo)
                    .collect())
            }
            FittedScaler::Standard { mean, scale } => {
                let scale = if scale[0] == 0.0 { 1.0 } else { scale[0] };
                Ok(column.iter().map(|x| (x - mean[0]) / scale).collect())
            }
        }
    }
}
