//! Error types for the demand planner.

use thiserror::Error;

/// Result type alias for planner operations.
pub type Result<T> = std::result::Result<T, PlannerError>;

/// Errors that can surface from a planning or evaluation run.
///
/// Numeric anomalies (zero metric denominators) and LP infeasibility are
/// recovered locally and never show up here.
#[derive(Error, Debug)]
pub enum PlannerError {
    /// A required upstream artifact was never produced.
    #[error("missing {artifact} at {path}")]
    MissingData { artifact: &'static str, path: String },

    /// Not enough history to build an evaluation window.
    #[error("insufficient history: {0}")]
    InsufficientHistory(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Two sequences that must line up do not.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// The same week appears twice for one SKU-location.
    #[error("duplicate observation for {store_id}|{product_id} at time key {time_key}")]
    DuplicateObservation {
        store_id: String,
        product_id: String,
        time_key: u32,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
