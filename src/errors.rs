use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::ColumnName;

/// Result alias used across the pipeline.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Error type for discovery, streaming, sink, and manifest failures.
///
/// Per-file variants (`NotFound`, `Schema`, `Stream`) are caught at the
/// orchestrator boundary and isolate a single input file; `EmptyInput` and
/// `Manifest` abort the whole run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("input path not found: {path}")]
    NotFound { path: PathBuf },
    #[error("column '{column}' not found in headers of {path}: {headers:?}")]
    Schema {
        path: PathBuf,
        column: ColumnName,
        headers: Vec<String>,
    },
    #[error("error streaming {path}: {reason}")]
    Stream { path: PathBuf, reason: String },
    #[error("no input files with accepted extensions under {path}")]
    EmptyInput { path: PathBuf },
    #[error("manifest generation failed: {0}")]
    Manifest(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}
