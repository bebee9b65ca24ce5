//! Error types for loading scenario assumptions and tax tables
//!
//! The projection itself never fails; only the file boundary does.

use std::path::PathBuf;

/// Errors raised while reading projection inputs
#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scenario JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid tax table: {reason}")]
    InvalidTaxTable { reason: String },
}

impl ProjectionError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ProjectionError::Io {
            path: path.into(),
            source,
        }
    }
}
