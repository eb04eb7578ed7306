use thiserror::Error;

use crate::import::ImportError;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("propagation error: {0}")]
    Propagation(String),
    #[error("no pass for {satellite} within {window_hours:.1} h of the search origin")]
    NoPass { satellite: String, window_hours: f64 },
    #[error("pass list duration must be non-zero")]
    InvalidDuration,
    #[error("train has no members")]
    EmptyTrain,
    #[error("import error: {0}")]
    Import(#[from] ImportError),
}
