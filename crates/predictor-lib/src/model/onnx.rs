//! ONNX pipeline inference using tract
//!
//! The artifact is an ONNX export of the whole pipeline: preprocessing and
//! classifier in one graph, one input per record column. Output 0 is the
//! class label and output 1 the per-class probabilities.

use super::features::{build_inputs, InputKind, InputSpec};
use crate::error::{LoadError, PredictError};
use crate::models::FeatureRow;
use crate::predictor::Pipeline;
use std::time::Instant;
use tract_onnx::prelude::*;
use tracing::debug;

/// Index of the class label output
const LABEL_OUTPUT: usize = 0;

/// Index of the per-class probability output
const PROBABILITIES_OUTPUT: usize = 1;

/// Model metadata key holding the pipeline version
const VERSION_KEY: &str = "version";

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// A pipeline graph ready to run one row at a time
pub struct OnnxPipeline {
    plan: TractModel,
    inputs: Vec<InputSpec>,
    version: String,
    description: Option<String>,
}

impl OnnxPipeline {
    /// Parse, check and optimize a pipeline graph from artifact bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LoadError> {
        let onnx = tract_onnx::onnx();
        let proto = onnx
            .proto_model_for_read(&mut std::io::Cursor::new(bytes))
            .map_err(model_error)?;

        let version = proto
            .metadata_props
            .iter()
            .find(|prop| prop.key == VERSION_KEY)
            .map(|prop| prop.value.clone())
            .unwrap_or_else(|| proto.model_version.to_string());
        let description = Some(proto.doc_string.clone()).filter(|d| !d.is_empty());

        let model = onnx
            .model_for_proto_model(&proto)
            .map_err(model_error)?
            .into_optimized()
            .map_err(model_error)?;

        let inputs = input_specs(&model)?;
        check_outputs(&model)?;

        let plan = model.into_runnable().map_err(model_error)?;

        Ok(Self {
            plan,
            inputs,
            version,
            description,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Graph inputs, in the order the graph declares them
    pub fn inputs(&self) -> &[InputSpec] {
        &self.inputs
    }

    /// Columns a row must carry for inference to succeed
    pub fn required_columns(&self) -> Vec<&str> {
        self.inputs.iter().map(|spec| spec.column.as_str()).collect()
    }
}

impl std::fmt::Debug for OnnxPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxPipeline")
            .field("version", &self.version)
            .field("inputs", &self.inputs)
            .finish_non_exhaustive()
    }
}

impl Pipeline for OnnxPipeline {
    fn classify(&self, row: &FeatureRow) -> Result<(i64, Vec<f64>), PredictError> {
        let start = Instant::now();
        let inputs = build_inputs(&self.inputs, row)?;

        let outputs = self
            .plan
            .run(inputs)
            .map_err(|e| PredictError::Inference(format!("{:#}", e)))?;

        let label = outputs
            .get(LABEL_OUTPUT)
            .ok_or_else(|| PredictError::Inference("no label output from model".to_string()))?
            .cast_to::<i64>()
            .map_err(inference_error)?
            .as_slice::<i64>()
            .map_err(inference_error)?
            .first()
            .copied()
            .ok_or_else(|| PredictError::Inference("empty label output".to_string()))?;

        let probabilities = outputs
            .get(PROBABILITIES_OUTPUT)
            .ok_or_else(|| {
                PredictError::Inference("no probability output from model".to_string())
            })?
            .cast_to::<f64>()
            .map_err(inference_error)?
            .as_slice::<f64>()
            .map_err(inference_error)?
            .to_vec();

        debug!(elapsed_us = start.elapsed().as_micros() as u64, "Graph run completed");
        Ok((label, probabilities))
    }

    fn version(&self) -> &str {
        &self.version
    }
}

fn input_specs(model: &TypedModel) -> Result<Vec<InputSpec>, LoadError> {
    let outlets = model.input_outlets().map_err(model_error)?;
    if outlets.is_empty() {
        return Err(LoadError::Invalid("graph declares no inputs".to_string()));
    }

    outlets
        .iter()
        .map(|outlet| {
            let column = model.node(outlet.node).name.clone();
            let fact = model.outlet_fact(*outlet).map_err(model_error)?;
            let kind = InputKind::from_datum_type(&column, fact.datum_type)?;
            Ok(InputSpec { column, kind })
        })
        .collect()
}

fn check_outputs(model: &TypedModel) -> Result<(), LoadError> {
    let outlets = model.output_outlets().map_err(model_error)?;
    if outlets.len() <= PROBABILITIES_OUTPUT {
        return Err(LoadError::Invalid(format!(
            "graph has {} outputs, expected a label and a probability output",
            outlets.len()
        )));
    }

    let label = model.outlet_fact(outlets[LABEL_OUTPUT]).map_err(model_error)?;
    if !label.datum_type.is_integer() {
        return Err(LoadError::Invalid(format!(
            "label output has element type {:?}, expected an integer",
            label.datum_type
        )));
    }
    let probabilities = model
        .outlet_fact(outlets[PROBABILITIES_OUTPUT])
        .map_err(model_error)?;
    if !probabilities.datum_type.is_float() {
        return Err(LoadError::Invalid(format!(
            "probability output has element type {:?}, expected a float",
            probabilities.datum_type
        )));
    }
    Ok(())
}

fn model_error(e: TractError) -> LoadError {
    LoadError::Model(format!("{:#}", e))
}

fn inference_error(e: TractError) -> PredictError {
    PredictError::Inference(format!("{:#}", e))
}
