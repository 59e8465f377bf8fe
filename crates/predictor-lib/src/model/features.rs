//! Tensor building for the pipeline graph inputs
//!
//! Every graph input is one record column, fed as a `[1, 1]` tensor of the
//! element type the graph declares. Only presence and conversion are checked
//! here; scaling and encoding happen inside the graph.

use crate::error::{LoadError, PredictError};
use crate::models::FeatureRow;
use serde_json::Value;
use tract_onnx::prelude::*;

/// Element type of one graph input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Float32,
    Float64,
    Int64,
    Text,
}

impl InputKind {
    pub fn from_datum_type(column: &str, datum_type: DatumType) -> Result<Self, LoadError> {
        match datum_type {
            DatumType::F32 => Ok(InputKind::Float32),
            DatumType::F64 => Ok(InputKind::Float64),
            DatumType::I64 => Ok(InputKind::Int64),
            DatumType::String => Ok(InputKind::Text),
            other => Err(LoadError::Invalid(format!(
                "input '{}' has unsupported element type {:?}",
                column, other
            ))),
        }
    }
}

/// A named graph input and the record column that feeds it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSpec {
    pub column: String,
    pub kind: InputKind,
}

impl InputSpec {
    pub fn new(column: impl Into<String>, kind: InputKind) -> Self {
        Self {
            column: column.into(),
            kind,
        }
    }

    fn tensor(&self, value: &Value) -> Result<Tensor, PredictError> {
        let column = self.column.as_str();
        let tensor = match self.kind {
            InputKind::Float32 => cell(numeric_value(column, value)? as f32),
            InputKind::Float64 => cell(numeric_value(column, value)?),
            InputKind::Int64 => cell(integer_value(column, value)?),
            InputKind::Text => cell(categorical_value(column, value)?),
        };
        Ok(tensor)
    }
}

/// Build one tensor per graph input, in graph order
///
/// Every missing column is reported at once before any value is converted.
pub fn build_inputs(specs: &[InputSpec], row: &FeatureRow) -> Result<TVec<TValue>, PredictError> {
    let missing: Vec<String> = specs
        .iter()
        .filter(|spec| !row.contains(&spec.column))
        .map(|spec| spec.column.clone())
        .collect();
    if !missing.is_empty() {
        return Err(PredictError::MissingColumns(missing));
    }

    specs
        .iter()
        .map(|spec| {
            let value = row
                .get(&spec.column)
                .ok_or_else(|| PredictError::MissingColumns(vec![spec.column.clone()]))?;
            spec.tensor(value).map(TValue::from)
        })
        .collect()
}

fn cell<T: Datum>(value: T) -> Tensor {
    tract_ndarray::arr2(&[[value]]).into()
}

fn invalid(column: &str, message: String) -> PredictError {
    PredictError::InvalidValue {
        column: column.to_string(),
        message,
    }
}

fn numeric_value(column: &str, value: &Value) -> Result<f64, PredictError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| invalid(column, format!("could not convert {} to float", n))),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid(column, format!("could not convert string to float: '{}'", s))),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Null => Err(invalid(column, "Input contains NaN".to_string())),
        other => Err(invalid(column, format!("could not convert {} to float", other))),
    }
}

fn integer_value(column: &str, value: &Value) -> Result<i64, PredictError> {
    if let Some(i) = value.as_i64() {
        return Ok(i);
    }
    let x = numeric_value(column, value)?;
    if x.fract() == 0.0 && x.is_finite() {
        Ok(x as i64)
    } else {
        Err(invalid(column, format!("could not convert {} to int", x)))
    }
}

fn categorical_value(column: &str, value: &Value) -> Result<String, PredictError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Err(invalid(column, "Input contains NaN".to_string())),
        other => Err(invalid(
            column,
            format!("expected a categorical value, found {}", other),
        )),
    }
}
