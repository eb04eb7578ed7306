use chrono::{DateTime, Duration, Utc};
use sgp4::{Constants, Elements};

use crate::batch::TrainSatellite;
use crate::predict::propagation::propagate_sample;
use crate::predict::types::{Pass, PassEvent};
use crate::predict::{GroundStation, PredictError};

const COARSE_STEP_SECONDS: i64 = 60; // 1 minute for initial scan
const FINE_STEP_SECONDS: i64 = 1; // 1 second for refinement
const HORIZON_ELEVATION: f64 = 0.0;

/// Single-satellite pass prediction, directed from a search origin and
/// bounded by a per-call timeout window.
pub trait PassPredictor {
    fn satellite_name(&self) -> &str;

    /// The next pass at or after `from` (forward) or the most recent pass at
    /// or before `from` (backward), looking no further than `timeout` away.
    fn next_pass(
        &self,
        from: DateTime<Utc>,
        forward: bool,
        timeout: Duration,
    ) -> Result<Pass, PredictError>;
}

/// SGP4-backed predictor: coarse horizon scan with bisection-refined
/// rise and set crossings.
pub struct HorizonPassFinder {
    name: String,
    norad_id: u64,
    station: GroundStation,
    elements: Elements,
    constants: Constants,
}

impl HorizonPassFinder {
    pub fn new(satellite: &TrainSatellite, station: GroundStation) -> Result<Self, PredictError> {
        let elements = satellite.tle().elements()?;
        let constants = Constants::from_elements(&elements)
            .map_err(|e| PredictError::Propagation(e.to_string()))?;
        Ok(Self {
            name: satellite.name().to_string(),
            norad_id: elements.norad_id,
            station,
            elements,
            constants,
        })
    }

    /// All complete passes inside `[start, end]`, chronological.
    fn passes_in_window(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Pass>, PredictError> {
        let coarse_step = Duration::seconds(COARSE_STEP_SECONDS);
        let mut passes = Vec::new();
        let mut cursor = start;

        let mut prev_visible = false;
        let mut rise: Option<PassEvent> = None;
        let mut culmination: Option<PassEvent> = None;

        while cursor <= end {
            let sample = propagate_sample(&self.station, &self.elements, &self.constants, cursor)?;
            let visible = sample.elevation_deg >= HORIZON_ELEVATION;

            if visible && !prev_visible {
                // Rise detected - refine to find exact crossing
                let refined = self.refine_crossing(cursor - coarse_step, cursor, true)?;
                rise = Some(refined);
                culmination = Some(event_from(&sample));
            } else if visible && rise.is_some() {
                // Track the culmination during the pass
                if culmination.map_or(true, |c| sample.elevation_deg > c.elevation_deg) {
                    culmination = Some(event_from(&sample));
                }
            } else if !visible && prev_visible {
                if let Some(rise_event) = rise.take() {
                    // Set detected - refine and close the pass
                    let set = self.refine_crossing(cursor - coarse_step, cursor, false)?;
                    passes.push(Pass {
                        satellite: self.name.clone(),
                        norad_id: self.norad_id,
                        rise: rise_event,
                        culmination: culmination.take(),
                        set,
                    });
                }
            }

            prev_visible = visible;
            cursor += coarse_step;
        }

        // Pass still in progress at the window edge: close it there.
        if let Some(rise_event) = rise {
            let sample = propagate_sample(&self.station, &self.elements, &self.constants, end)?;
            passes.push(Pass {
                satellite: self.name.clone(),
                norad_id: self.norad_id,
                rise: rise_event,
                culmination,
                set: event_from(&sample),
            });
        }

        Ok(passes)
    }

    /// Binary search for the exact horizon crossing between two samples.
    fn refine_crossing(
        &self,
        before: DateTime<Utc>,
        after: DateTime<Utc>,
        is_rise: bool,
    ) -> Result<PassEvent, PredictError> {
        let mut low = before;
        let mut high = after;

        while (high - low).num_seconds() > FINE_STEP_SECONDS {
            let mid = low + (high - low) / 2;
            let sample = propagate_sample(&self.station, &self.elements, &self.constants, mid)?;

            let above = sample.elevation_deg >= HORIZON_ELEVATION;
            if is_rise == above {
                high = mid;
            } else {
                low = mid;
            }
        }

        let sample = propagate_sample(&self.station, &self.elements, &self.constants, high)?;
        Ok(event_from(&sample))
    }
}

impl PassPredictor for HorizonPassFinder {
    fn satellite_name(&self) -> &str {
        &self.name
    }

    fn next_pass(
        &self,
        from: DateTime<Utc>,
        forward: bool,
        timeout: Duration,
    ) -> Result<Pass, PredictError> {
        let (start, end) = if forward {
            (from, from + timeout)
        } else {
            (from - timeout, from)
        };

        let passes = self.passes_in_window(start, end)?;
        let found = if forward {
            passes.into_iter().next()
        } else {
            passes.into_iter().last()
        };

        found.ok_or_else(|| PredictError::NoPass {
            satellite: self.name.clone(),
            window_hours: timeout.num_seconds() as f64 / 3600.0,
        })
    }
}

fn event_from(sample: &crate::predict::ObserverSample) -> PassEvent {
    PassEvent {
        time: sample.timestamp,
        azimuth_deg: sample.azimuth_deg,
        elevation_deg: sample.elevation_deg,
    }
}
