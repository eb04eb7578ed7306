use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// One visibility info-point: where the satellite stood at an event instant.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PassEvent {
    pub time: DateTime<Utc>,
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
}

/// One satellite's continuous interval above the observer's horizon.
#[derive(Debug, Clone, Serialize)]
pub struct Pass {
    pub satellite: String,
    pub norad_id: u64,
    pub rise: PassEvent,
    pub culmination: Option<PassEvent>,
    pub set: PassEvent,
}

impl Pass {
    pub fn duration(&self) -> Duration {
        self.set.time - self.rise.time
    }

    /// Every non-null info-point of the pass.
    pub fn events(&self) -> Vec<PassEvent> {
        let mut events = vec![self.rise];
        if let Some(culmination) = self.culmination {
            events.push(culmination);
        }
        events.push(self.set);
        events
    }
}

/// One continuous observer-visible event of a whole train: the overlapping
/// passes of consecutive members merged together.
#[derive(Debug, Clone, Serialize)]
pub struct TrainPass {
    batch_tag: String,
    passes: Vec<Pass>,
    events: Vec<PassEvent>,
}

impl TrainPass {
    /// `passes` must be non-empty and in member order.
    pub(crate) fn new(batch_tag: String, passes: Vec<Pass>) -> Self {
        let events = passes.iter().flat_map(Pass::events).collect();
        Self {
            batch_tag,
            passes,
            events,
        }
    }

    pub fn batch_tag(&self) -> &str {
        &self.batch_tag
    }

    /// The merged per-satellite passes, in member order.
    pub fn passes(&self) -> &[Pass] {
        &self.passes
    }

    /// Union of the info-points of all merged passes.
    pub fn events(&self) -> &[PassEvent] {
        &self.events
    }

    /// Rise of the first merged pass.
    pub fn rise(&self) -> PassEvent {
        self.passes[0].rise
    }

    /// Set of the last merged pass.
    pub fn set(&self) -> PassEvent {
        self.passes[self.passes.len() - 1].set
    }

    pub fn duration(&self) -> Duration {
        self.set().time - self.rise().time
    }
}
