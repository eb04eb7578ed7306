use chrono::{DateTime, Utc};

use crate::batch::plane::partition_by_raan;
use crate::batch::{BatchError, Plane, Train, TrainSatellite};
use crate::config::Config;
use crate::import::TleImporter;

/// All satellites of one launch, classified into planes and trains at a fixed
/// reference instant. Immutable once built; construction fails as a whole on
/// any bad tag, missing mapping or propagation error.
#[derive(Debug)]
pub struct Batch {
    time: DateTime<Utc>,
    batch_tag: String,
    group_number: String,
    international_designator: String,
    planes: Vec<Plane>,
    trains: Vec<Train>,
}

impl Batch {
    /// Classify the batch named by `batch_tag` (e.g. "6-21").
    ///
    /// The tag resolves to an international designator through
    /// `config.launches` before anything is imported; `time` defaults to now.
    pub fn new(
        importer: &impl TleImporter,
        batch_tag: &str,
        config: &Config,
        time: Option<DateTime<Utc>>,
    ) -> Result<Self, BatchError> {
        let group_number = parse_batch_tag(batch_tag)?;
        let international_designator = config
            .launches
            .get(batch_tag)
            .cloned()
            .ok_or_else(|| BatchError::UnknownLaunch(batch_tag.to_string()))?;
        let time = time.unwrap_or_else(Utc::now);

        let tles = importer.fetch_batch(&international_designator)?;
        let mut satellites = Vec::with_capacity(tles.len());
        for tle in tles {
            satellites.push(TrainSatellite::at_epoch(tle, time)?);
        }
        let satellite_count = satellites.len();

        let groups = partition_by_raan(satellites, config.defaults.raan_stdev_outlier);
        let mut planes = Vec::with_capacity(groups.len());
        for group in groups {
            planes.push(Plane::new(group, &group_number, config)?);
        }

        let mut trains = Vec::new();
        for plane in &planes {
            for run in plane.train_runs(
                config.defaults.maximum_train_gap_deg,
                config.defaults.maximum_train_height_km,
            ) {
                if run.len() >= config.defaults.minimum_train_length {
                    trains.push(Train::from_run(plane, run, batch_tag));
                }
            }
        }

        log::info!(
            "batch {batch_tag}: {satellite_count} satellites, {} planes, {} trains",
            planes.len(),
            trains.len()
        );

        Ok(Self {
            time,
            batch_tag: batch_tag.to_string(),
            group_number,
            international_designator,
            planes,
            trains,
        })
    }

    /// Reference instant all derived scalars were computed at.
    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    pub fn batch_tag(&self) -> &str {
        &self.batch_tag
    }

    pub fn group_number(&self) -> &str {
        &self.group_number
    }

    pub fn international_designator(&self) -> &str {
        &self.international_designator
    }

    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    pub fn trains(&self) -> &[Train] {
        &self.trains
    }

    /// Every satellite of the batch, in plane order.
    pub fn satellites(&self) -> impl Iterator<Item = &TrainSatellite> {
        self.planes.iter().flat_map(|plane| plane.satellites())
    }
}

/// A batch tag is "<group>-<launch>", both decimal; returns the group number.
fn parse_batch_tag(batch_tag: &str) -> Result<String, BatchError> {
    let invalid = || BatchError::InvalidBatchTag(batch_tag.to_string());

    let (group, launch) = batch_tag.split_once('-').ok_or_else(invalid)?;
    let all_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if !all_digits(group) || !all_digits(launch) {
        return Err(invalid());
    }
    Ok(group.to_string())
}
