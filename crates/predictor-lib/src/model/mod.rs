//! Pipeline artifact: an ONNX graph holding preprocessing and classifier
//!
//! The artifact is loaded once at process start. Loading checks the graph's
//! inputs and outputs, so a loaded pipeline can only fail at inference time
//! because of the row.

mod artifact;
mod features;
mod onnx;

pub use artifact::{load_artifact, ModelArtifact, DEFAULT_MODEL_PATH};
pub use features::{build_inputs, InputKind, InputSpec};
pub use onnx::OnnxPipeline;
