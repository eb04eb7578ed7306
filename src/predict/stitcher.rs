use chrono::{DateTime, Duration, Utc};

use crate::batch::Train;
use crate::predict::pass_finder::{HorizonPassFinder, PassPredictor};
use crate::predict::types::{Pass, TrainPass};
use crate::predict::{GroundStation, PredictError};

/// Search window handed to each member predictor when none is given.
pub const DEFAULT_PASS_TIMEOUT_DAYS: i64 = 7;

// Nudge past a found pass so the same event is not found again.
const SEARCH_GUARD_SECONDS: i64 = 9;

/// Where a combined-pass search starts.
#[derive(Debug, Clone, Copy)]
pub enum SearchOrigin {
    /// Search from this instant.
    Instant(DateTime<Utc>),
    /// Search just past the final set-time of an earlier combined pass.
    PastSet(DateTime<Utc>),
}

impl SearchOrigin {
    fn resolve(self) -> DateTime<Utc> {
        match self {
            SearchOrigin::Instant(time) => time,
            SearchOrigin::PastSet(time) => time + Duration::seconds(SEARCH_GUARD_SECONDS),
        }
    }
}

impl From<DateTime<Utc>> for SearchOrigin {
    fn from(time: DateTime<Utc>) -> Self {
        SearchOrigin::Instant(time)
    }
}

impl From<&TrainPass> for SearchOrigin {
    fn from(pass: &TrainPass) -> Self {
        SearchOrigin::PastSet(pass.set().time)
    }
}

/// Combined-pass search over a whole train: one predictor per member,
/// constructed once, queried in member order and stitched greedily.
pub struct TrainPassFinder<P = HorizonPassFinder> {
    batch_tag: String,
    predictors: Vec<P>,
}

impl TrainPassFinder<HorizonPassFinder> {
    pub fn new(train: &Train, station: GroundStation) -> Result<Self, PredictError> {
        let mut predictors = Vec::with_capacity(train.len());
        for satellite in train.satellites() {
            predictors.push(HorizonPassFinder::new(satellite, station)?);
        }
        Ok(Self {
            batch_tag: train.batch_tag().to_string(),
            predictors,
        })
    }
}

impl<P: PassPredictor> TrainPassFinder<P> {
    /// Stitcher over caller-supplied predictors, one per member in train
    /// order. Useful when per-member queries are fanned out elsewhere; the
    /// merge itself is a pure function of the member passes.
    pub fn from_predictors(batch_tag: &str, predictors: Vec<P>) -> Self {
        Self {
            batch_tag: batch_tag.to_string(),
            predictors,
        }
    }

    /// One combined pass: every member is asked for its next pass from
    /// `origin`, then passes are merged while each one rises before the
    /// previous included one sets. The scan stops at the first gap -- the
    /// result is one continuous observer-visible event, not every event in
    /// the train. Per-member failures propagate.
    pub fn compute_next_pass(
        &self,
        origin: impl Into<SearchOrigin>,
        forward: bool,
        timeout: Duration,
    ) -> Result<TrainPass, PredictError> {
        let from = origin.into().resolve();

        let mut member_passes = Vec::with_capacity(self.predictors.len());
        for predictor in &self.predictors {
            member_passes.push(predictor.next_pass(from, forward, timeout)?);
        }

        let mut passes: Vec<Pass> = Vec::with_capacity(member_passes.len());
        for pass in member_passes {
            let overlaps = match passes.last() {
                None => true,
                Some(previous) => previous.set.time > pass.rise.time,
            };
            if !overlaps {
                break;
            }
            passes.push(pass);
        }
        if passes.is_empty() {
            return Err(PredictError::EmptyTrain);
        }

        Ok(TrainPass::new(self.batch_tag.clone(), passes))
    }

    /// Chronological combined passes whose rise falls inside
    /// `[start, start + duration)`. A negative duration searches backward
    /// (most recent first); zero is rejected.
    ///
    /// Best effort: once at least one pass has been collected, a failing
    /// search ends the scan and returns the partial list; a failure before
    /// any progress propagates.
    pub fn compute_pass_list(
        &self,
        start: DateTime<Utc>,
        duration: Duration,
    ) -> Result<Vec<TrainPass>, PredictError> {
        if duration.is_zero() {
            return Err(PredictError::InvalidDuration);
        }
        let forward = duration > Duration::zero();
        let end = start + duration;
        let timeout = Duration::days(DEFAULT_PASS_TIMEOUT_DAYS);

        let mut result: Vec<TrainPass> = Vec::new();
        let mut cursor = start;
        loop {
            let next = match self.compute_next_pass(cursor, forward, timeout) {
                Ok(pass) => pass,
                Err(error) => {
                    if result.is_empty() {
                        return Err(error);
                    }
                    log::warn!(
                        "pass search stopped after {} passes: {error}",
                        result.len()
                    );
                    return Ok(result);
                }
            };

            let rise = next.rise().time;
            let out_of_window = if forward { rise >= end } else { rise <= end };
            if out_of_window {
                break;
            }

            cursor = if forward {
                next.set().time + Duration::seconds(SEARCH_GUARD_SECONDS)
            } else {
                next.rise().time - Duration::seconds(SEARCH_GUARD_SECONDS)
            };
            result.push(next);
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::types::PassEvent;
    use std::cell::RefCell;

    fn instant(offset_minutes: i64) -> DateTime<Utc> {
        "2026-03-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap()
            + Duration::minutes(offset_minutes)
    }

    fn event(offset_minutes: i64) -> PassEvent {
        PassEvent {
            time: instant(offset_minutes),
            azimuth_deg: 180.0,
            elevation_deg: 0.0,
        }
    }

    fn pass(name: &str, rise_min: i64, set_min: i64) -> Pass {
        Pass {
            satellite: name.to_string(),
            norad_id: 0,
            rise: event(rise_min),
            culmination: Some(PassEvent {
                time: instant((rise_min + set_min) / 2),
                azimuth_deg: 90.0,
                elevation_deg: 45.0,
            }),
            set: event(set_min),
        }
    }

    /// Scripted predictor: returns the first scripted pass whose rise is at
    /// or after the query time, or fails when the script runs out.
    struct ScriptedPredictor {
        name: String,
        passes: Vec<Pass>,
    }

    impl ScriptedPredictor {
        fn new(name: &str, passes: Vec<Pass>) -> Self {
            Self {
                name: name.to_string(),
                passes,
            }
        }
    }

    impl PassPredictor for ScriptedPredictor {
        fn satellite_name(&self) -> &str {
            &self.name
        }

        fn next_pass(
            &self,
            from: DateTime<Utc>,
            forward: bool,
            _timeout: Duration,
        ) -> Result<Pass, PredictError> {
            assert!(forward, "scripted predictor only supports forward search");
            self.passes
                .iter()
                .find(|p| p.rise.time >= from)
                .cloned()
                .ok_or_else(|| PredictError::NoPass {
                    satellite: self.name.clone(),
                    window_hours: 0.0,
                })
        }
    }

    /// Predictor that starts failing after a set number of calls.
    struct FlakyPredictor {
        inner: ScriptedPredictor,
        calls_before_failure: RefCell<usize>,
    }

    impl PassPredictor for FlakyPredictor {
        fn satellite_name(&self) -> &str {
            self.inner.satellite_name()
        }

        fn next_pass(
            &self,
            from: DateTime<Utc>,
            forward: bool,
            timeout: Duration,
        ) -> Result<Pass, PredictError> {
            let mut remaining = self.calls_before_failure.borrow_mut();
            if *remaining == 0 {
                return Err(PredictError::Propagation("diverged".to_string()));
            }
            *remaining -= 1;
            self.inner.next_pass(from, forward, timeout)
        }
    }

    #[test]
    fn overlapping_passes_merge_until_first_gap() {
        // A sets at T+10, B rises at T+5 (overlaps A) and sets at T+20,
        // C rises at T+25 (no overlap with B): the combined pass is A + B.
        let finder = TrainPassFinder::from_predictors(
            "6-21",
            vec![
                ScriptedPredictor::new("a", vec![pass("a", 0, 10)]),
                ScriptedPredictor::new("b", vec![pass("b", 5, 20)]),
                ScriptedPredictor::new("c", vec![pass("c", 25, 35)]),
            ],
        );

        let combined = finder
            .compute_next_pass(instant(0), true, Duration::days(1))
            .unwrap();

        assert_eq!(combined.batch_tag(), "6-21");
        assert_eq!(combined.passes().len(), 2);
        assert_eq!(combined.passes()[0].satellite, "a");
        assert_eq!(combined.passes()[1].satellite, "b");
        assert_eq!(combined.rise().time, instant(0));
        assert_eq!(combined.set().time, instant(20));
        // Rise, culmination and set of both included passes.
        assert_eq!(combined.events().len(), 6);
    }

    #[test]
    fn members_after_the_first_gap_are_excluded_even_if_overlapping() {
        // D overlaps C, but the scan already stopped at the B/C gap.
        let finder = TrainPassFinder::from_predictors(
            "6-21",
            vec![
                ScriptedPredictor::new("a", vec![pass("a", 0, 10)]),
                ScriptedPredictor::new("b", vec![pass("b", 5, 20)]),
                ScriptedPredictor::new("c", vec![pass("c", 25, 35)]),
                ScriptedPredictor::new("d", vec![pass("d", 30, 40)]),
            ],
        );

        let combined = finder
            .compute_next_pass(instant(0), true, Duration::days(1))
            .unwrap();
        assert_eq!(combined.passes().len(), 2);
    }

    #[test]
    fn touching_passes_do_not_merge() {
        // B rises exactly when A sets: the overlap must be strict.
        let finder = TrainPassFinder::from_predictors(
            "6-21",
            vec![
                ScriptedPredictor::new("a", vec![pass("a", 0, 10)]),
                ScriptedPredictor::new("b", vec![pass("b", 10, 20)]),
            ],
        );

        let combined = finder
            .compute_next_pass(instant(0), true, Duration::days(1))
            .unwrap();
        assert_eq!(combined.passes().len(), 1);
        assert_eq!(combined.passes()[0].satellite, "a");
    }

    #[test]
    fn a_previous_combined_pass_seeds_the_next_search() {
        let finder = TrainPassFinder::from_predictors(
            "6-21",
            vec![ScriptedPredictor::new(
                "a",
                vec![pass("a", 0, 10), pass("a", 90, 100)],
            )],
        );

        let first = finder
            .compute_next_pass(instant(0), true, Duration::days(1))
            .unwrap();
        let second = finder
            .compute_next_pass(&first, true, Duration::days(1))
            .unwrap();
        assert_eq!(second.rise().time, instant(90));
    }

    #[test]
    fn member_failure_propagates_from_compute_next_pass() {
        let finder = TrainPassFinder::from_predictors(
            "6-21",
            vec![
                ScriptedPredictor::new("a", vec![pass("a", 0, 10)]),
                ScriptedPredictor::new("b", vec![]),
            ],
        );

        let err = finder
            .compute_next_pass(instant(0), true, Duration::days(1))
            .unwrap_err();
        assert!(matches!(err, PredictError::NoPass { satellite, .. } if satellite == "b"));
    }

    #[test]
    fn pass_list_is_chronological_and_bounded() {
        let finder = TrainPassFinder::from_predictors(
            "6-21",
            vec![ScriptedPredictor::new(
                "a",
                vec![
                    pass("a", 0, 10),
                    pass("a", 90, 100),
                    pass("a", 180, 190),
                    pass("a", 270, 280),
                ],
            )],
        );

        let passes = finder
            .compute_pass_list(instant(0), Duration::minutes(200))
            .unwrap();

        assert_eq!(passes.len(), 3);
        let rises: Vec<_> = passes.iter().map(|p| p.rise().time).collect();
        let mut sorted = rises.clone();
        sorted.sort();
        assert_eq!(rises, sorted);
        assert!(rises.iter().all(|&t| t < instant(200)));
    }

    #[test]
    fn zero_duration_is_rejected() {
        let finder = TrainPassFinder::from_predictors(
            "6-21",
            vec![ScriptedPredictor::new("a", vec![pass("a", 0, 10)])],
        );
        let err = finder
            .compute_pass_list(instant(0), Duration::zero())
            .unwrap_err();
        assert!(matches!(err, PredictError::InvalidDuration));
    }

    #[test]
    fn failure_after_progress_returns_the_partial_list() {
        let finder = TrainPassFinder::from_predictors(
            "6-21",
            vec![FlakyPredictor {
                inner: ScriptedPredictor::new(
                    "a",
                    vec![pass("a", 0, 10), pass("a", 90, 100), pass("a", 180, 190)],
                ),
                calls_before_failure: RefCell::new(2),
            }],
        );

        let passes = finder
            .compute_pass_list(instant(0), Duration::minutes(500))
            .unwrap();
        assert_eq!(passes.len(), 2);
    }

    #[test]
    fn failure_with_no_progress_propagates() {
        let finder = TrainPassFinder::from_predictors(
            "6-21",
            vec![ScriptedPredictor::new("a", vec![])],
        );
        let err = finder
            .compute_pass_list(instant(0), Duration::minutes(500))
            .unwrap_err();
        assert!(matches!(err, PredictError::NoPass { .. }));
    }
}
