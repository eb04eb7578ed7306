use std::ops::Range;

use crate::batch::{BatchError, TrainSatellite};
use crate::config::Config;

/// Split a batch into RAAN clusters with a greedy dispersion test.
///
/// Satellites sharing an orbital plane have nearly identical RAAN, so after an
/// ascending sort a window is grown one satellite at a time until the sample
/// standard deviation of the window reaches `outlier_threshold`; the window
/// then closes one short of the breaching satellite and a new one starts
/// there. Every satellite lands in exactly one group and the final group
/// absorbs the remainder; a lone leftover becomes a singleton group.
pub fn partition_by_raan(
    mut satellites: Vec<TrainSatellite>,
    outlier_threshold: f64,
) -> Vec<Vec<TrainSatellite>> {
    satellites.sort_by(|a, b| a.raan().total_cmp(&b.raan()));
    let count = satellites.len();

    let mut ranges: Vec<Range<usize>> = Vec::new();
    let mut start = 0;
    while start < count {
        if count - start == 1 {
            ranges.push(start..count);
            break;
        }

        let mut end = count;
        // The last satellite never triggers a breach on its own; it is
        // absorbed by whichever window reaches it.
        for i in (start + 2)..count {
            let window: Vec<f64> = satellites[start..i].iter().map(|s| s.raan()).collect();
            if sample_stdev(&window) >= outlier_threshold {
                end = i - 1;
                break;
            }
        }

        ranges.push(start..end);
        start = end;
    }

    let mut groups = Vec::with_capacity(ranges.len());
    for range in ranges.iter().rev() {
        groups.push(satellites.split_off(range.start));
    }
    groups.reverse();
    groups
}

/// Sample (n-1) standard deviation. Caller guarantees `values.len() >= 2`.
fn sample_stdev(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    variance.sqrt()
}

/// One orbital plane: a RAAN cluster held in orbit order, gaps and phases
/// filled. Immutable once built.
#[derive(Debug, Clone)]
pub struct Plane {
    group_number: String,
    raan: f64,
    satellites: Vec<TrainSatellite>,
}

impl Plane {
    pub(crate) fn new(
        satellites: Vec<TrainSatellite>,
        group_number: &str,
        config: &Config,
    ) -> Result<Self, BatchError> {
        if !config.groups.contains_key(group_number) {
            return Err(BatchError::UnknownGroup(group_number.to_string()));
        }

        let raan = satellites
            .iter()
            .map(TrainSatellite::raan)
            .fold(f64::INFINITY, f64::min);

        let mut satellites = order_around_seam(satellites);
        apply_phases(&mut satellites);

        Ok(Self {
            group_number: group_number.to_string(),
            raan,
            satellites,
        })
    }

    pub fn group_number(&self) -> &str {
        &self.group_number
    }

    /// Representative RAAN: the minimum over the cluster, degrees.
    pub fn raan(&self) -> f64 {
        self.raan
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

    /// Contiguous runs qualifying as trains, before the minimum-length cut.
    ///
    /// A run extends while the last member's gap stays below `max_gap_deg` and
    /// both the last member and the candidate sit at or below
    /// `max_height_km`. Runs never overlap and never revisit a satellite.
    pub(crate) fn train_runs(&self, max_gap_deg: f64, max_height_km: f64) -> Vec<Range<usize>> {
        let count = self.satellites.len();
        let mut runs = Vec::new();

        let mut i = 0;
        while i + 1 < count {
            let mut end = i + 1;
            while end < count {
                let last = &self.satellites[end - 1];
                let candidate = &self.satellites[end];
                if last.gap() < max_gap_deg
                    && last.height_km() <= max_height_km
                    && candidate.height_km() <= max_height_km
                {
                    end += 1;
                } else {
                    break;
                }
            }
            runs.push(i..end);
            i = end;
        }

        runs
    }
}

/// Sort by latitude argument descending, fill circular gaps, and rotate so the
/// list starts just past the largest empty arc of the ring. Ties on the
/// maximal gap keep the first occurrence in sort order.
fn order_around_seam(mut satellites: Vec<TrainSatellite>) -> Vec<TrainSatellite> {
    satellites.sort_by(|a, b| b.latitude_argument().total_cmp(&a.latitude_argument()));
    let count = satellites.len();

    for i in 0..count {
        let next = satellites[(i + 1) % count].latitude_argument();
        let mut gap = satellites[i].latitude_argument() - next;
        if gap < 0.0 {
            gap += 360.0;
        }
        satellites[i].set_gap(gap);
    }

    let mut seam = 0;
    for i in 1..count {
        if satellites[i].gap() > satellites[seam].gap() {
            seam = i;
        }
    }

    if seam != count - 1 {
        satellites.rotate_left(seam + 1);
    }
    satellites
}

/// Phase the lead satellite at 0.0 and every follower at its latitude-argument
/// offset behind the lead, always <= 0.
pub(crate) fn apply_phases(satellites: &mut [TrainSatellite]) {
    let Some(first) = satellites.first() else {
        return;
    };
    let base = first.latitude_argument();

    satellites[0].set_phase(0.0);
    for satellite in &mut satellites[1..] {
        let mut phase = satellite.latitude_argument() - base;
        if phase > 0.0 {
            phase -= 360.0;
        }
        satellite.set_phase(phase);
    }
}
