mod batch;
mod elements;
mod error;
mod plane;
mod satellite;
mod train;

pub use batch::Batch;
pub use elements::{elements_from_state, OsculatingElements, EARTH_EQUATORIAL_RADIUS_KM};
pub use error::BatchError;
pub use plane::{partition_by_raan, Plane};
pub use satellite::TrainSatellite;
pub use train::Train;
