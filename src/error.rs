// src/error.rs
use thiserror::Error;

/// Errors raised while configuring smoothers or moving landmark data in and out.
#[derive(Error, Debug)]
pub enum SmootherError {
    #[error("EWMA strength must be in [0, 1), got {0}")]
    InvalidStrength(f64),

    #[error("{name} must be a finite value greater than zero, got {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("Unknown filter kind: {0} (expected none, ewma or kalman)")]
    UnknownFilter(String),

    #[error("Malformed observation on line {line}: {source}")]
    MalformedObservation {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, SmootherError>;
