//! Unit tests for artifact loading at startup

use std::path::PathBuf;

use ndarray::Array3;

use crate::doubles::rising_prices;
use trendcast::inference::model::check_input_dims;
use trendcast::inference::{
    ArtifactPaths, ConfigurationError, FittedScaler, InferencePipeline, ModelArtifacts,
    OnnxSequenceModel, PipelineConfig, SequenceModel, WindowNormalizer,
};
use trendcast::models::PredictionLabel;

// Both fixtures compute sigmoid(mean(input)); one declares (1, 30, 1), the
// other leaves the sequence axis dynamic.
const FIXED_MODEL: &str = "tests/fixtures/mean_sigmoid_t30.onnx";
const DYNAMIC_MODEL: &str = "tests/fixtures/mean_sigmoid_dynamic.onnx";

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("trendcast-{}-{}", std::process::id(), name))
}

#[test]
fn test_missing_scaler_is_configuration_error() {
    let paths = ArtifactPaths {
        model: temp_path("absent-model.onnx"),
        scaler: temp_path("absent-scaler.json"),
    };
    let err = ModelArtifacts::load(&paths, 30).err().unwrap();
    assert!(matches!(
        err,
        ConfigurationError::ArtifactMissing {
            artifact: "scaler",
            ..
        }
    ));
}

#[test]
fn test_missing_model_is_configuration_error() {
    let scaler_path = temp_path("scaler.json");
    std::fs::write(
        &scaler_path,
        r#"{"kind": "min_max", "data_min": [80.0], "data_max": [120.0]}"#,
    )
    .unwrap();

    let paths = ArtifactPaths {
        model: temp_path("absent-model.onnx"),
        scaler: scaler_path.clone(),
    };
    let err = ModelArtifacts::load(&paths, 30).err().unwrap();
    assert!(matches!(
        err,
        ConfigurationError::ArtifactMissing {
            artifact: "model",
            ..
        }
    ));

    std::fs::remove_file(scaler_path).ok();
}

#[test]
fn test_scaler_load_from_file() {
    let path = temp_path("standard-scaler.json");
    std::fs::write(&path, r#"{"kind": "standard", "mean": [10.0], "scale": [2.0]}"#).unwrap();

    let scaler = FittedScaler::load(&path).unwrap();
    assert_eq!(scaler, FittedScaler::standard(10.0, 2.0));

    std::fs::remove_file(path).ok();
}

#[test]
fn test_corrupt_scaler_file_is_unreadable() {
    let path = temp_path("corrupt-scaler.json");
    std::fs::write(&path, "not json").unwrap();

    let err = FittedScaler::load(&path).unwrap_err();
    assert!(matches!(err, ConfigurationError::ScalerUnreadable { .. }));

    std::fs::remove_file(path).ok();
}

#[test]
fn test_input_dims_accept_matching_and_dynamic_axes() {
    assert!(check_input_dims(&[1, 30, 1], 30).is_ok());
    assert!(check_input_dims(&[-1, 30, 1], 30).is_ok());
    assert!(check_input_dims(&[-1, -1, 1], 60).is_ok());
}

#[test]
fn test_input_dims_reject_other_window_or_rank() {
    assert!(check_input_dims(&[1, 60, 1], 30).is_err());
    assert!(check_input_dims(&[1, 30, 4], 30).is_err());
    assert!(check_input_dims(&[1, 30], 30).is_err());
}

#[test]
fn test_onnx_model_loads_and_runs_zero_window() {
    let model = OnnxSequenceModel::load(&PathBuf::from(FIXED_MODEL), 30).unwrap();

    let prob = model.forward(&WindowNormalizer::new(30).zeros()).unwrap();
    assert!((prob - 0.5).abs() < 1e-6);
    assert_eq!(model.path(), PathBuf::from(FIXED_MODEL).as_path());
}

#[test]
fn test_onnx_model_with_other_window_is_shape_mismatch() {
    let err = OnnxSequenceModel::load(&PathBuf::from(FIXED_MODEL), 60)
        .err()
        .unwrap();
    assert!(matches!(
        err,
        ConfigurationError::ShapeMismatch { timesteps: 60, .. }
    ));
}

#[test]
fn test_onnx_model_with_dynamic_axis_accepts_configured_window() {
    let model = OnnxSequenceModel::load(&PathBuf::from(DYNAMIC_MODEL), 60).unwrap();

    let input = Array3::<f32>::from_elem((1, 60, 1), 0.2);
    let prob = model.forward(&input).unwrap();
    let expected = 1.0 / (1.0 + (-0.2f64).exp());
    assert!((prob - expected).abs() < 1e-5);
}

#[test]
fn test_corrupt_model_file_is_unloadable() {
    let path = temp_path("corrupt-model.onnx");
    std::fs::write(&path, b"not an onnx graph").unwrap();

    let err = OnnxSequenceModel::load(&path, 30).err().unwrap();
    assert!(matches!(err, ConfigurationError::ModelUnloadable { .. }));

    std::fs::remove_file(path).ok();
}

#[test]
fn test_loaded_artifacts_drive_pipeline() {
    let scaler_path = temp_path("pipeline-scaler.json");
    std::fs::write(
        &scaler_path,
        r#"{"kind": "min_max", "data_min": [0.0], "data_max": [200.0]}"#,
    )
    .unwrap();

    let paths = ArtifactPaths {
        model: PathBuf::from(FIXED_MODEL),
        scaler: scaler_path.clone(),
    };
    let artifacts = ModelArtifacts::load(&paths, 30).unwrap();
    assert_eq!(artifacts.model.name(), "ONNX Runtime (LSTM)");
    let pipeline = InferencePipeline::new(PipelineConfig::default(), artifacts);

    // scaled window sits around 0.57, so sigmoid lands above 0.5
    let result = pipeline.run(&rising_prices(40, 100.0)).unwrap();
    assert_eq!(result.label(), PredictionLabel::Bullish);
    assert!(result.confidence() > 50.0 && result.confidence() < 70.0);
    assert_eq!(result.accuracy(), 100.0);

    std::fs::remove_file(scaler_path).ok();
}
