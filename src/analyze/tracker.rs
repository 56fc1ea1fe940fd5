use super::maturity::round_to;
use crate::types::usage::{EntityUsage, TrackingPeriod, UsageState};
use chrono::{DateTime, Utc};

/// Success rate assumed before the first observation.
pub const NEUTRAL_PRIOR: f64 = 0.5;

/// Folds one outcome into `usage`.
///
/// The prior counts as one pseudo-observation, so after `n` outcomes the
/// rate is `(0.5 + successes) / (n + 1)`. The rate is derived from the exact
/// counts on every update and stored rounded to 2 decimals.
pub fn apply_outcome(usage: &mut EntityUsage, succeeded: bool, at: DateTime<Utc>) {
    let successes = usage.success_count() + u64::from(succeeded);
    usage.invocations += 1;
    usage.successes = Some(successes);
    usage.success_rate = round_to(
        (NEUTRAL_PRIOR + successes as f64) / (usage.invocations + 1) as f64,
        2,
    );
    usage.last_used_at = Some(at);
}

/// Updates a usage snapshot one observed outcome at a time.
///
/// Callers must serialize updates for the same entity; the tracker holds no
/// locks and is meant to run once per observed event.
pub struct IncrementalRateTracker {
    state: UsageState,
}

impl IncrementalRateTracker {
    pub fn new(state: UsageState) -> Self {
        Self { state }
    }

    pub fn record(&mut self, entity_id: &str, succeeded: bool) -> EntityUsage {
        self.record_at(entity_id, succeeded, Utc::now())
    }

    pub fn record_at(&mut self, entity_id: &str, succeeded: bool, at: DateTime<Utc>) -> EntityUsage {
        let usage = self
            .state
            .entities
            .entry(entity_id.to_string())
            .or_insert_with(|| EntityUsage::new(entity_id));
        apply_outcome(usage, succeeded, at);
        let updated = usage.clone();

        match &mut self.state.tracking_period {
            Some(period) => period.extend_to(at),
            None => self.state.tracking_period = Some(TrackingPeriod::starting_at(at)),
        }

        tracing::debug!(
            entity = entity_id,
            succeeded,
            invocations = updated.invocations,
            success_rate = updated.success_rate,
            "recorded outcome"
        );
        updated
    }

    pub fn state(&self) -> &UsageState {
        &self.state
    }
}
