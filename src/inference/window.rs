//! Fixed-length windowing and scaling of a cleaned price series.

use ndarray::Array3;
use tracing::warn;

use super::scaler::Scaler;

/// Exactly `timesteps` prices, most recent observation last.
pub type FixedWindow = Vec<f64>;

/// Model input of shape `(1, timesteps, 1)`.
pub type ScaledTensor = Array3<f32>;

/// Which path produced a normalized tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowOrigin {
    /// Scaled from real observations.
    Observed,
    /// All-zero tensor because the cleaned series was empty.
    EmptyInput,
    /// All-zero tensor substituted after the scaler failed or returned a malformed column.
    ShapeFallback,
}

#[derive(Debug, Clone)]
pub struct NormalizedWindow {
    pub tensor: ScaledTensor,
    pub origin: WindowOrigin,
}

impl NormalizedWindow {
    pub fn is_all_zero(&self) -> bool {
        self.tensor.iter().all(|v| *v == 0.0)
    }
}

/// Left-pad with zeros or keep the most recent `timesteps` entries.
pub fn build_window(cleaned: &[f64], timesteps: usize) -> FixedWindow {
    if cleaned.len() >= timesteps {
        return cleaned[cleaned.len() - timesteps..].to_vec();
    }
    let mut window = vec![0.0; timesteps - cleaned.len()];
    window.extend_from_slice(cleaned);
    window
}

#[derive(Debug, Clone, Copy)]
pub struct WindowNormalizer {
    timesteps: usize,
}

impl WindowNormalizer {
    pub fn new(timesteps: usize) -> Self {
        Self { timesteps }
    }

    pub fn timesteps(&self) -> usize {
        self.timesteps
    }

    pub fn zeros(&self) -> ScaledTensor {
        Array3::zeros((1, self.timesteps, 1))
    }

    /// Window and scale `cleaned`. Always returns a `(1, timesteps, 1)` tensor.
    pub fn normalize(&self, cleaned: &[f64], scaler: &dyn Scaler) -> NormalizedWindow {
        if cleaned.is_empty() {
            return NormalizedWindow {
                tensor: self.zeros(),
                origin: WindowOrigin::EmptyInput,
            };
        }

        let window = build_window(cleaned, self.timesteps);
        let scaled = match scaler.transform(&window) {
            Ok(scaled) => scaled,
            Err(e) => {
                warn!(error = %e, "Scaler transform failed, substituting zero window");
                return self.fallback();
            }
        };

        if scaled.len() != self.timesteps {
            warn!(
                expected = self.timesteps,
                actual = scaled.len(),
                "Scaled window has wrong shape ({}, 1), substituting zero window",
                scaled.len()
            );
            return self.fallback();
        }
        if scaled.iter().any(|v| !v.is_finite()) {
            warn!("Scaled window contains non-finite values, substituting zero window");
            return self.fallback();
        }

        let values: Vec<f32> = scaled.iter().map(|v| *v as f32).collect();
        match Array3::from_shape_vec((1, self.timesteps, 1), values) {
            Ok(tensor) => NormalizedWindow {
                tensor,
                origin: WindowOrigin::Observed,
            },
            Err(e) => {
                warn!(error = %e, "Failed to shape scaled window, substituting zero window");
                self.fallback()
            }
        }
    }

    fn fallback(&self) -> NormalizedWindow {
        NormalizedWindow {
            tensor: self.zeros(),
            origin: WindowOrigin::ShapeFallback,
        }
    }
}
