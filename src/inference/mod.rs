//! Inference core: cleaning, windowing, scaling, prediction and accuracy.

pub mod accuracy;
pub mod cleaner;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod predictor;
pub mod scaler;
pub mod window;

pub use accuracy::AccuracyPolicy;
pub use cleaner::{clean_series, CleanedSeries};
pub use error::{ConfigurationError, DataStage, InferenceError, PipelineError, ScalerError};
pub use model::{ArtifactPaths, ModelArtifacts, OnnxSequenceModel, SequenceModel};
pub use pipeline::{InferencePipeline, PipelineConfig};
pub use predictor::{Prediction, Predictor};
pub use scaler::{FittedScaler, Scaler};
pub use window::{
    build_window, FixedWindow, NormalizedWindow, ScaledTensor, WindowNormalizer, WindowOrigin,
};
