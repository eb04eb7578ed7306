mod error;
mod tle_file;

pub use error::ImportError;
pub use tle_file::{Tle, TleFileImporter, TleImporter};
