//! Inference call against a loaded pipeline

use super::Pipeline;
use crate::error::PredictError;
use crate::models::FeatureRow;
use std::time::Instant;
use tracing::debug;

/// Raw outcome of running the pipeline on one row
///
/// Only built through [`Prediction::new`], so the label is always binary and
/// its probability is always present and within [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    label: u8,
    probability: f64,
    probabilities: Vec<f64>,
}

impl Prediction {
    pub fn new(label: i64, probabilities: Vec<f64>) -> Result<Self, PredictError> {
        let label = match label {
            0 => 0u8,
            1 => 1u8,
            other => {
                return Err(PredictError::Inference(format!(
                    "unexpected class label {}",
                    other
                )))
            }
        };
        let probability = probabilities.get(label as usize).copied().ok_or_else(|| {
            PredictError::Inference(format!(
                "probability vector has {} entries but the predicted label is {}",
                probabilities.len(),
                label
            ))
        })?;
        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(PredictError::Inference(format!(
                "probability {} is outside [0, 1]",
                probability
            )));
        }

        Ok(Self {
            label,
            probability,
            probabilities,
        })
    }

    /// Predicted class label, 0 (nominal) or 1 (failure)
    pub fn label(&self) -> u8 {
        self.label
    }

    /// Probability of the predicted class
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Per-class probabilities indexed by label
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }
}

/// Classify one row and pick the probability of the predicted class
pub fn run_inference(pipeline: &dyn Pipeline, row: &FeatureRow) -> Result<Prediction, PredictError> {
    let start = Instant::now();

    let (label, probabilities) = pipeline.classify(row)?;
    let prediction = Prediction::new(label, probabilities)?;

    debug!(
        label = prediction.label,
        probability = prediction.probability,
        elapsed_us = start.elapsed().as_micros() as u64,
        "Inference completed"
    );

    Ok(prediction)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedPipeline {
        label: i64,
        proba: Vec<f64>,
    }

    impl Pipeline for FixedPipeline {
        fn classify(&self, _row: &FeatureRow) -> Result<(i64, Vec<f64>), PredictError> {
            Ok((self.label, self.proba.clone()))
        }

        fn version(&self) -> &str {
            "fixed"
        }
    }

    struct FailingPipeline;

    impl Pipeline for FailingPipeline {
        fn classify(&self, _row: &FeatureRow) -> Result<(i64, Vec<f64>), PredictError> {
            Err(PredictError::MissingColumns(vec!["Torque [Nm]".into()]))
        }

        fn version(&self) -> &str {
            "failing"
        }
    }

    fn empty_row() -> FeatureRow {
        FeatureRow::new(serde_json::Map::new())
    }

    #[test]
    fn test_selects_probability_of_predicted_label() {
        let pipeline = FixedPipeline {
            label: 1,
            proba: vec![0.2, 0.8],
        };
        let prediction = run_inference(&pipeline, &empty_row()).unwrap();

        assert_eq!(prediction.label(), 1);
        assert_eq!(prediction.probability(), 0.8);
        assert_eq!(prediction.probabilities(), &[0.2, 0.8]);
    }

    #[test]
    fn test_nominal_uses_first_probability() {
        let pipeline = FixedPipeline {
            label: 0,
            proba: vec![0.65, 0.35],
        };
        let prediction = run_inference(&pipeline, &empty_row()).unwrap();
        assert_eq!(prediction.probability(), 0.65);
    }

    #[test]
    fn test_pipeline_error_propagates() {
        let err = run_inference(&FailingPipeline, &empty_row()).unwrap_err();
        assert!(matches!(err, PredictError::MissingColumns(_)));
    }

    #[test]
    fn test_short_probability_vector_rejected() {
        let pipeline = FixedPipeline {
            label: 1,
            proba: vec![1.0],
        };
        let err = run_inference(&pipeline, &empty_row()).unwrap_err();
        assert!(matches!(err, PredictError::Inference(_)));
    }

    #[test]
    fn test_empty_probabilities_never_panic() {
        let err = Prediction::new(1, vec![]).unwrap_err();
        assert!(matches!(err, PredictError::Inference(_)));
        assert!(Prediction::new(0, vec![]).is_err());
    }

    #[test]
    fn test_non_binary_label_rejected() {
        let pipeline = FixedPipeline {
            label: 2,
            proba: vec![0.1, 0.1, 0.8],
        };
        assert!(run_inference(&pipeline, &empty_row()).is_err());
        assert!(Prediction::new(-1, vec![0.5, 0.5]).is_err());
    }

    #[test]
    fn test_out_of_range_probability_rejected() {
        let pipeline = FixedPipeline {
            label: 0,
            proba: vec![1.5, -0.5],
        };
        assert!(run_inference(&pipeline, &empty_row()).is_err());
    }
}
