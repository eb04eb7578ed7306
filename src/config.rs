use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Classification thresholds and per-group/launch tables.
///
/// A partial file is merged over the module defaults: any threshold missing
/// from the `defaults` section keeps its built-in value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub groups: HashMap<String, GroupConfig>,
    /// Batch tag (e.g. "6-21") to international designator (e.g. "24012").
    #[serde(default)]
    pub launches: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Defaults {
    /// Sample standard deviation of RAAN (degrees) at which a growing plane
    /// window is considered breached.
    #[serde(default = "default_raan_stdev_outlier")]
    pub raan_stdev_outlier: f64,
    /// Largest along-track gap (degrees) between consecutive train members.
    #[serde(default = "default_maximum_train_gap_deg")]
    pub maximum_train_gap_deg: f64,
    /// Largest orbital height (km) a train member may have.
    #[serde(default = "default_maximum_train_height_km")]
    pub maximum_train_height_km: f64,
    /// Smallest run of satellites kept as a train.
    #[serde(default = "default_minimum_train_length")]
    pub minimum_train_length: usize,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            raan_stdev_outlier: default_raan_stdev_outlier(),
            maximum_train_gap_deg: default_maximum_train_gap_deg(),
            maximum_train_height_km: default_maximum_train_height_km(),
            minimum_train_length: default_minimum_train_length(),
        }
    }
}

fn default_raan_stdev_outlier() -> f64 {
    1.25
}

fn default_maximum_train_gap_deg() -> f64 {
    5.0
}

fn default_maximum_train_height_km() -> f64 {
    350.0
}

fn default_minimum_train_length() -> usize {
    2
}

/// Per-group settings. The classifier only requires the entry to exist;
/// the fields inform operators and downstream tooling.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupConfig {
    pub nominal_altitude_km: Option<f64>,
    pub nominal_inclination_deg: Option<f64>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }
}
