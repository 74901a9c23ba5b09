//! Error types for the cl-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the pipeline crates.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to read analysis config: {path}")]
    ConfigFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse analysis config {path}: {source}")]
    ConfigFileParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Dataset assembly failed: {0}")]
    Assemble(#[from] cl_dataset::AssembleError),

    #[error("Enrichment failed: {0}")]
    Metrics(#[from] cl_metrics::MetricsError),
}

/// Result type for cl-app operations.
pub type AppResult<T> = Result<T, AppError>;
