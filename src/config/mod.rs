//! Environment-driven service configuration.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::inference::pipeline::{
    DEFAULT_MIN_RAW_POINTS, DEFAULT_MIN_VALID_POINTS, DEFAULT_TIMESTEPS,
};
use crate::inference::{AccuracyPolicy, ArtifactPaths, ConfigurationError, PipelineConfig};
use crate::services::alpha_vantage::DEFAULT_BASE_URL;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_FIXED_ACCURACY: f64 = 75.0;

/// Deployment environment name from `APP_ENV`, defaulting to `sandbox`.
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

/// Values reported by `/status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    pub model_version: String,
    pub next_retraining: String,
}

impl Default for StatusInfo {
    fn default() -> Self {
        Self {
            model_version: "V1.0".to_string(),
            next_retraining: "2026-01-01".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub port: u16,
    pub artifacts: ArtifactPaths,
    pub pipeline: PipelineConfig,
    pub alpha_vantage_key: Option<String>,
    pub alpha_vantage_base_url: String,
    pub template_dir: PathBuf,
    pub static_dir: PathBuf,
    pub status: StatusInfo,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            artifacts: ArtifactPaths {
                model: PathBuf::from("itc_lstm_model.onnx"),
                scaler: PathBuf::from("scaler.json"),
            },
            pipeline: PipelineConfig::default(),
            alpha_vantage_key: None,
            alpha_vantage_base_url: DEFAULT_BASE_URL.to_string(),
            template_dir: PathBuf::from("templates"),
            static_dir: PathBuf::from("static"),
            status: StatusInfo::default(),
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset keys take their defaults;
    /// set but unparseable keys are a [`ConfigurationError`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let timesteps = parse_or(&lookup, "TIMESTEPS", DEFAULT_TIMESTEPS)?;
        if timesteps == 0 {
            return Err(ConfigurationError::InvalidSetting {
                key: "TIMESTEPS",
                value: "0".to_string(),
            });
        }

        let min_valid_points = parse_or(&lookup, "MIN_VALID_POINTS", DEFAULT_MIN_VALID_POINTS)?;
        if min_valid_points < 2 {
            // the comparative accuracy check needs two points
            return Err(ConfigurationError::InvalidSetting {
                key: "MIN_VALID_POINTS",
                value: min_valid_points.to_string(),
            });
        }

        let pipeline = PipelineConfig {
            timesteps,
            min_raw_points: parse_or(&lookup, "MIN_RAW_POINTS", DEFAULT_MIN_RAW_POINTS)?,
            min_valid_points,
            accuracy: accuracy_policy(&lookup)?,
        };

        let artifacts = ArtifactPaths {
            model: lookup("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.artifacts.model),
            scaler: lookup("SCALER_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.artifacts.scaler),
        };

        Ok(Self {
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            artifacts,
            pipeline,
            alpha_vantage_key: lookup("ALPHA_VANTAGE_KEY").filter(|k| !k.trim().is_empty()),
            alpha_vantage_base_url: lookup("ALPHA_VANTAGE_BASE_URL")
                .unwrap_or(defaults.alpha_vantage_base_url),
            template_dir: lookup("TEMPLATE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.template_dir),
            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            status: StatusInfo {
                model_version: lookup("MODEL_VERSION").unwrap_or(defaults.status.model_version),
                next_retraining: lookup("NEXT_RETRAINING")
                    .unwrap_or(defaults.status.next_retraining),
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigurationError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigurationError::InvalidSetting { key, value: raw }),
    }
}

fn accuracy_policy<F>(lookup: &F) -> Result<AccuracyPolicy, ConfigurationError>
where
    F: Fn(&str) -> Option<String>,
{
    let mode = lookup("ACCURACY_MODE").unwrap_or_else(|| "comparative".to_string());
    match mode.trim().to_lowercase().as_str() {
        "comparative" => Ok(AccuracyPolicy::Comparative),
        "fixed" => {
            let value: f64 = parse_or(lookup, "ACCURACY_FIXED_ESTIMATE", DEFAULT_FIXED_ACCURACY)?;
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigurationError::InvalidSetting {
                    key: "ACCURACY_FIXED_ESTIMATE",
                    value: value.to_string(),
                });
            }
            Ok(AccuracyPolicy::Fixed(value))
        }
        _ => Err(ConfigurationError::InvalidSetting {
            key: "ACCURACY_MODE",
            value: mode,
        }),
    }
}
