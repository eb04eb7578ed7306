use chrono::{DateTime, Utc};

use crate::batch::elements::{elements_from_state, EARTH_EQUATORIAL_RADIUS_KM};
use crate::batch::BatchError;
use crate::import::Tle;

/// One batch member: the raw element set plus the scalars derived from it at
/// the batch reference instant. Phase and gap are assigned later, while the
/// owning plane orders its satellites.
#[derive(Debug, Clone)]
pub struct TrainSatellite {
    name: String,
    tle: Tle,
    raan: f64,
    latitude_argument: f64,
    height_km: f64,
    phase: f64,
    gap: f64,
}

impl TrainSatellite {
    /// Propagate the element set to `time` and fill the derived scalars.
    pub fn at_epoch(tle: Tle, time: DateTime<Utc>) -> Result<Self, BatchError> {
        let name = tle.display_name();
        let elements = tle.elements()?;
        let constants = sgp4::Constants::from_elements(&elements)
            .map_err(|e| propagation_error(&name, e))?;
        let minutes = elements
            .datetime_to_minutes_since_epoch(&time.naive_utc())
            .map_err(|e| propagation_error(&name, e))?;
        let prediction = constants
            .propagate(minutes)
            .map_err(|e| propagation_error(&name, e))?;

        let osculating = elements_from_state(prediction.position, prediction.velocity);

        Ok(Self {
            name,
            tle,
            raan: osculating.raan_deg,
            latitude_argument: osculating.latitude_argument_deg(),
            height_km: osculating.semi_major_axis_km - EARTH_EQUATORIAL_RADIUS_KM,
            phase: 0.0,
            gap: 0.0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tle(&self) -> &Tle {
        &self.tle
    }

    /// Right ascension of the ascending node, degrees in [0, 360).
    pub fn raan(&self) -> f64 {
        self.raan
    }

    /// Argument of perigee + true anomaly, degrees in [0, 360).
    pub fn latitude_argument(&self) -> f64 {
        self.latitude_argument
    }

    /// Offset behind the lead satellite of the plane or train, degrees <= 0.
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Separation to the next satellite in orbit order, degrees >= 0.
    pub fn gap(&self) -> f64 {
        self.gap
    }

    /// Orbital height above the equatorial radius, km.
    pub fn height_km(&self) -> f64 {
        self.height_km
    }

    pub(crate) fn set_phase(&mut self, phase: f64) {
        self.phase = phase;
    }

    pub(crate) fn set_gap(&mut self, gap: f64) {
        self.gap = gap;
    }

    /// Satellite with hand-filled scalars, for exercising the classification
    /// logic without element sets.
    #[cfg(test)]
    pub(crate) fn synthetic(name: &str, raan: f64, latitude_argument: f64, height_km: f64) -> Self {
        Self {
            name: name.to_string(),
            tle: Tle {
                name: Some(name.to_string()),
                line1: String::new(),
                line2: String::new(),
            },
            raan,
            latitude_argument,
            height_km,
            phase: 0.0,
            gap: 0.0,
        }
    }
}

fn propagation_error(satellite: &str, error: impl std::fmt::Display) -> BatchError {
    BatchError::Propagation {
        satellite: satellite.to_string(),
        message: error.to_string(),
    }
}
