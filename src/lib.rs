//! Classification of batch-launched satellites into orbital planes and trains,
//! and prediction of combined train passes over a ground station.

pub mod batch;
pub mod config;
pub mod import;
pub mod predict;
