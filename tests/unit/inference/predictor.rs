//! Unit tests for label and confidence calibration

use crate::doubles::{FailingModel, StubModel};
use trendcast::inference::predictor::round_one_decimal;
use trendcast::inference::{InferenceError, Prediction, Predictor, WindowNormalizer};
use trendcast::models::PredictionLabel;

fn zeros() -> trendcast::inference::ScaledTensor {
    WindowNormalizer::new(30).zeros()
}

#[test]
fn test_bullish_confidence_is_probability() {
    let prediction = Predictor::predict(&zeros(), &StubModel::new(0.8)).unwrap();
    assert_eq!(prediction.label, PredictionLabel::Bullish);
    assert_eq!(prediction.confidence, 80.0);
}

#[test]
fn test_bearish_confidence_is_complement() {
    let prediction = Predictor::predict(&zeros(), &StubModel::new(0.2)).unwrap();
    assert_eq!(prediction.label, PredictionLabel::Bearish);
    assert_eq!(prediction.confidence, 80.0);
}

#[test]
fn test_half_probability_is_bullish() {
    let prediction = Prediction::from_probability(0.5);
    assert_eq!(prediction.label, PredictionLabel::Bullish);
    assert_eq!(prediction.confidence, 50.0);
}

#[test]
fn test_confidence_rounds_to_one_decimal() {
    assert_eq!(Prediction::from_probability(0.87654).confidence, 87.7);
    assert_eq!(Prediction::from_probability(0.12345).confidence, 87.7);
}

#[test]
fn test_confidence_halves_round_to_even() {
    // 0.5625 and 0.4375 are exact in f32, so the percentage lands on a tie
    assert_eq!(Prediction::from_probability(0.5625).confidence, 56.2);
    assert_eq!(Prediction::from_probability(0.4375).confidence, 56.2);
    assert_eq!(round_one_decimal(87.65432), 87.7);
}

#[test]
fn test_label_and_confidence_consistency() {
    for step in 0..=100 {
        let prob = step as f64 / 100.0;
        let prediction = Prediction::from_probability(prob);
        assert!((0.0..=100.0).contains(&prediction.confidence));
        assert_eq!(prediction.label == PredictionLabel::Bullish, prob >= 0.5);
        let expected = if prob >= 0.5 { prob * 100.0 } else { (1.0 - prob) * 100.0 };
        assert_eq!(prediction.confidence, (expected * 10.0).round_ties_even() / 10.0);
        assert!(prediction.confidence >= 50.0);
    }
}

#[test]
fn test_out_of_range_probability_is_malformed() {
    let err = Predictor::predict(&zeros(), &StubModel::new(1.5)).unwrap_err();
    assert!(matches!(err, InferenceError::MalformedOutput(_)));

    let err = Predictor::predict(&zeros(), &StubModel::new(f64::NAN)).unwrap_err();
    assert!(matches!(err, InferenceError::MalformedOutput(_)));
}

#[test]
fn test_forward_failure_propagates() {
    let err = Predictor::predict(&zeros(), &FailingModel).unwrap_err();
    assert!(matches!(err, InferenceError::ForwardPass(_)));
}
