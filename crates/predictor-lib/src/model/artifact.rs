//! Loading the pipeline artifact from disk

use super::OnnxPipeline;
use crate::error::LoadError;
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Fixed filename the artifact is read from when no other path is configured
pub const DEFAULT_MODEL_PATH: &str = "predictive_maintenance_pipeline.onnx";

/// A loaded pipeline together with where it came from
#[derive(Debug)]
pub struct ModelArtifact {
    pub pipeline: OnnxPipeline,
    pub path: PathBuf,
    /// Hex-encoded SHA256 of the artifact bytes
    pub checksum: String,
    pub size_bytes: usize,
}

impl ModelArtifact {
    pub fn version(&self) -> &str {
        self.pipeline.version()
    }

    /// First 12 hex characters of the checksum, for logs and metric labels
    pub fn short_checksum(&self) -> &str {
        &self.checksum[..self.checksum.len().min(12)]
    }
}

/// Read, fingerprint and load the artifact at `path`
pub fn load_artifact(path: impl AsRef<Path>) -> Result<ModelArtifact, LoadError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let checksum = hex::encode(Sha256::digest(&bytes));
    let pipeline = OnnxPipeline::from_bytes(&bytes)?;

    debug!(
        path = %path.display(),
        version = %pipeline.version(),
        checksum = %checksum,
        "Model artifact loaded"
    );

    Ok(ModelArtifact {
        pipeline,
        path: path.to_path_buf(),
        checksum,
        size_bytes: bytes.len(),
    })
}
