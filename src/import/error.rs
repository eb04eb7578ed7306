use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("TLE file read error: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("not an international designator: {0}")]
    InvalidDesignator(String),
    #[error("invalid TLE for {name}: {message}")]
    InvalidTle { name: String, message: String },
    #[error("no satellites matching international designator {0}")]
    NoSuchDesignator(String),
    #[error("no satellite named {0}")]
    NoSuchSatellite(String),
}
