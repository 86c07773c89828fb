//! Sequence model artifacts and ONNX Runtime inference.

use ort::session::Session;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::info;

use super::error::{ConfigurationError, InferenceError};
use super::scaler::{FittedScaler, Scaler};
use super::window::{ScaledTensor, WindowNormalizer};

/// Forward pass from a `(1, timesteps, 1)` tensor to a bullish probability.
pub trait SequenceModel: Send + Sync {
    fn forward(&self, input: &ScaledTensor) -> Result<f64, InferenceError>;

    fn name(&self) -> &str {
        "sequence-model"
    }
}

/// LSTM exported to ONNX.
///
/// `Session::run` needs exclusive access, so the session sits behind a mutex.
/// Requests never change the model itself.
pub struct OnnxSequenceModel {
    session: Mutex<Session>,
    path: PathBuf,
}

impl OnnxSequenceModel {
    /// Load the model, check its declared input against `(1, timesteps, 1)` and
    /// run one zero-window pass.
    ///
    /// A model exported for a different window length fails here, at startup,
    /// rather than on the first request.
    pub fn load(path: &Path, timesteps: usize) -> Result<Self, ConfigurationError> {
        if !path.exists() {
            return Err(ConfigurationError::ArtifactMissing {
                artifact: "model",
                path: path.to_path_buf(),
            });
        }

        let session = open_session(path).map_err(|e| ConfigurationError::ModelUnloadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let declared = session
            .inputs
            .first()
            .and_then(|input| input.input_type.tensor_shape())
            .map(|shape| shape.to_vec())
            .ok_or_else(|| ConfigurationError::ShapeMismatch {
                timesteps,
                reason: "model has no tensor input".to_string(),
            })?;
        check_input_dims(&declared, timesteps)
            .map_err(|reason| ConfigurationError::ShapeMismatch { timesteps, reason })?;

        let model = Self {
            session: Mutex::new(session),
            path: path.to_path_buf(),
        };

        let warmup = WindowNormalizer::new(timesteps).zeros();
        model
            .forward(&warmup)
            .map_err(|e| ConfigurationError::ShapeMismatch {
                timesteps,
                reason: e.to_string(),
            })?;

        info!(path = %path.display(), timesteps, "ONNX model loaded");
        Ok(model)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Compare declared input dims with `(1, timesteps, 1)`.
///
/// Dynamic axes (reported as `-1`) accept any length; the warm-up pass still
/// has to succeed for them.
pub fn check_input_dims(dims: &[i64], timesteps: usize) -> Result<(), String> {
    let expected = [1, timesteps as i64, 1];
    if dims.len() != expected.len() {
        return Err(format!(
            "expected a rank-3 input (batch, timesteps, features), model declares {:?}",
            dims
        ));
    }
    for (axis, (&declared, &wanted)) in dims.iter().zip(expected.iter()).enumerate() {
        if declared > 0 && declared != wanted {
            return Err(format!(
                "input axis {} is {} but the window needs {} (declared {:?})",
                axis, declared, wanted, dims
            ));
        }
    }
    Ok(())
}

fn open_session(path: &Path) -> ort::Result<Session> {
    Session::builder()?.with_intra_threads(1)?.commit_from_file(path)
}

impl SequenceModel for OnnxSequenceModel {
    fn forward(&self, input: &ScaledTensor) -> Result<f64, InferenceError> {
        let shape = input.shape().to_vec();
        let flat_data: Vec<f32> = input.iter().copied().collect();

        let input_value = ort::value::Value::from_array((shape.as_slice(), flat_data))
            .map_err(|e| InferenceError::ForwardPass(format!("input tensor creation failed: {}", e)))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| InferenceError::ModelUnavailable)?;

        let outputs = session
            .run(ort::inputs![input_value])
            .map_err(|e| InferenceError::ForwardPass(e.to_string()))?;

        let output_value = outputs
            .iter()
            .next()
            .map(|(_, v)| v)
            .ok_or_else(|| InferenceError::MalformedOutput("no output tensor".to_string()))?;
        let (_, data) = output_value
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::MalformedOutput(e.to_string()))?;
        let prob = data
            .iter()
            .next()
            .copied()
            .ok_or_else(|| InferenceError::MalformedOutput("empty output tensor".to_string()))?;

        Ok(prob as f64)
    }

    fn name(&self) -> &str {
        "ONNX Runtime (LSTM)"
    }
}

/// Filesystem locations of the fitted artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub scaler: PathBuf,
}

/// Model and scaler loaded once at startup and shared read-only by every request.
#[derive(Clone)]
pub struct ModelArtifacts {
    pub model: Arc<dyn SequenceModel>,
    pub scaler: Arc<dyn Scaler>,
}

impl ModelArtifacts {
    pub fn new(model: Arc<dyn SequenceModel>, scaler: Arc<dyn Scaler>) -> Self {
        Self { model, scaler }
    }

    /// Load both artifacts, failing fast if either is missing or unusable.
    pub fn load(paths: &ArtifactPaths, timesteps: usize) -> Result<Self, ConfigurationError> {
        let scaler = FittedScaler::load(&paths.scaler)?;
        info!(path = %paths.scaler.display(), "Scaler loaded");
        let model = OnnxSequenceModel::load(&paths.model, timesteps)?;
        Ok(Self::new(Arc::new(model), Arc::new(scaler)))
    }
}
