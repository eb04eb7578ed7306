use thiserror::Error;

use crate::import::ImportError;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("invalid batch tag syntax: {0}")]
    InvalidBatchTag(String),
    #[error("no launch mapping for batch {0}")]
    UnknownLaunch(String),
    #[error("no group configuration for group {0}")]
    UnknownGroup(String),
    #[error("import error: {0}")]
    Import(#[from] ImportError),
    #[error("propagation error for {satellite}: {message}")]
    Propagation { satellite: String, message: String },
}
