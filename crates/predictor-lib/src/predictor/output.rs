//! Prediction output formatting
//!
//! Maps a raw prediction to the response payload: status label, boolean
//! outcome, confidence percentage and the echoed caller record.

use super::inference::Prediction;
use crate::models::{InputRecord, PredictionResponse, PredictionStatus};

/// Decimal places kept in the confidence percentage
pub const CONFIDENCE_DECIMALS: i32 = 2;

/// Convert a probability in [0, 1] to a percentage rounded to two decimals
pub fn confidence_percent(probability: f64) -> f64 {
    let factor = 10f64.powi(CONFIDENCE_DECIMALS);
    let percent = (probability * 100.0).clamp(0.0, 100.0);
    (percent * factor).round() / factor
}

/// Build the response payload, echoing the unaugmented record
pub fn format_response(prediction: &Prediction, inputs: InputRecord) -> PredictionResponse {
    let status = PredictionStatus::from_label(prediction.label());
    PredictionResponse {
        status,
        is_failure: status.is_failure(),
        confidence: confidence_percent(prediction.probability()),
        inputs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn inputs() -> InputRecord {
        match json!({"Torque [Nm]": 42.8, "Type": "L"}) {
            serde_json::Value::Object(map) => InputRecord::new(map),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_failure_label_maps_to_failure_status() {
        let prediction = Prediction::new(1, vec![0.1234, 0.8766]).unwrap();
        let response = format_response(&prediction, inputs());

        assert_eq!(response.status, PredictionStatus::FailurePredicted);
        assert!(response.is_failure);
        assert_eq!(response.confidence, 87.66);
    }

    #[test]
    fn test_nominal_label_maps_to_nominal_status() {
        let prediction = Prediction::new(0, vec![0.99274, 0.00726]).unwrap();
        let response = format_response(&prediction, inputs());

        assert_eq!(response.status, PredictionStatus::Nominal);
        assert!(!response.is_failure);
        assert_eq!(response.confidence, 99.27);
    }

    #[test]
    fn test_confidence_rounding_and_bounds() {
        assert_eq!(confidence_percent(1.0), 100.0);
        assert_eq!(confidence_percent(0.0), 0.0);
        assert_eq!(confidence_percent(0.5), 50.0);
        assert_eq!(confidence_percent(0.123456), 12.35);
        assert_eq!(confidence_percent(1.0000001), 100.0);
    }

    #[test]
    fn test_serialized_payload_shape() {
        let prediction = Prediction::new(1, vec![0.25, 0.75]).unwrap();
        let value = serde_json::to_value(format_response(&prediction, inputs())).unwrap();

        assert_eq!(
            value,
            json!({
                "status": "Failure Predicted",
                "is_failure": true,
                "confidence": 75.0,
                "inputs": {"Torque [Nm]": 42.8, "Type": "L"}
            })
        );
    }
}
