use std::ops::Range;

use crate::batch::plane::apply_phases;
use crate::batch::{Plane, TrainSatellite};

/// A tight run of low satellites from one plane, stored as an independent
/// snapshot: the satellites are copies, re-phased against the run's own lead,
/// and never change afterwards.
#[derive(Debug, Clone)]
pub struct Train {
    batch_tag: String,
    satellites: Vec<TrainSatellite>,
}

impl Train {
    /// Snapshot the satellites at `run` within `plane`.
    pub fn from_run(plane: &Plane, run: Range<usize>, batch_tag: &str) -> Self {
        let mut satellites = plane.satellites()[run].to_vec();
        apply_phases(&mut satellites);
        Self {
            batch_tag: batch_tag.to_string(),
            satellites,
        }
    }

    pub fn batch_tag(&self) -> &str {
        &self.batch_tag
    }

    pub fn satellites(&self) -> &[TrainSatellite] {
        &self.satellites
    }

    pub fn len(&self) -> usize {
        self.satellites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.satellites.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, GroupConfig};

    fn plane_of(latitude_arguments: &[f64]) -> Plane {
        let satellites = latitude_arguments
            .iter()
            .enumerate()
            .map(|(i, &arg)| TrainSatellite::synthetic(&format!("s{i}"), 10.0, arg, 300.0))
            .collect();
        let mut config = Config::default();
        config.groups.insert("4".to_string(), GroupConfig::default());
        Plane::new(satellites, "4", &config).unwrap()
    }

    #[test]
    fn train_is_rephased_against_its_own_lead() {
        // Descending: 100, 98, 96, 50; the wrap gap (310) is largest, so the
        // order stands and plane phases are 0, -2, -4, -50.
        let plane = plane_of(&[100.0, 98.0, 96.0, 50.0]);
        let run = 1..3;
        let train = Train::from_run(&plane, run, "6-21");

        assert_eq!(train.len(), 2);
        assert_eq!(train.satellites()[0].phase(), 0.0);
        assert!((train.satellites()[1].phase() + 2.0).abs() < 1e-9);
        // The source plane keeps its original phases.
        assert!((plane.satellites()[1].phase() + 2.0).abs() < 1e-9);
        assert!((plane.satellites()[2].phase() + 4.0).abs() < 1e-9);
    }

    #[test]
    fn snapshot_is_independent_of_the_plane() {
        let plane = plane_of(&[100.0, 99.0, 98.0]);
        let train = Train::from_run(&plane, 0..3, "6-21");

        for (copy, source) in train.satellites().iter().zip(plane.satellites()) {
            assert_eq!(copy.raan(), source.raan());
            assert_eq!(copy.gap(), source.gap());
            assert_eq!(copy.height_km(), source.height_km());
            assert_eq!(copy.latitude_argument(), source.latitude_argument());
        }
        assert_eq!(train.batch_tag(), "6-21");
    }
}
