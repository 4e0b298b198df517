//! Generator error types.
//!
//! Every failure mode has a named variant. Generation is all-or-nothing: any
//! of these aborts the run before or while writing output.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SynthError {
    #[error("catalog too small: {catalog} has {len} entries, needs at least {min}")]
    CatalogTooSmall {
        catalog: &'static str,
        len: usize,
        min: usize,
    },

    #[error("invalid base excursion rate {0}: must be finite and non-negative")]
    InvalidBaseRate(f64),

    #[error("invalid temperature bands: {0}")]
    InvalidBand(String),

    #[error("invalid shipment count {0}: must be between 1 and {max}", max = crate::config::MAX_SHIPMENTS)]
    InvalidShipmentCount(usize),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SynthError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for generator operations.
pub type SynthResult<T> = Result<T, SynthError>;
