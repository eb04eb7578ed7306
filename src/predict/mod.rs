mod error;
mod ground_station;
mod pass_finder;
mod propagation;
mod stitcher;
mod types;

pub use error::PredictError;
pub use ground_station::GroundStation;
pub use pass_finder::{HorizonPassFinder, PassPredictor};
pub use propagation::{propagate_sample, ObserverSample};
pub use stitcher::{SearchOrigin, TrainPassFinder, DEFAULT_PASS_TIMEOUT_DAYS};
pub use types::{Pass, PassEvent, TrainPass};
