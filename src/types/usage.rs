use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityUsage {
    #[serde(skip)]
    pub id: String,
    #[serde(default)]
    pub invocations: u64,
    /// Exact success count; absent in files written before it existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub successes: Option<u64>,
    #[serde(default, rename = "lastUsed")]
    pub last_used_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "avgSuccessRate")]
    pub success_rate: f64,
    #[serde(default)]
    pub recommendations_made: u64,
    #[serde(default)]
    pub adoption_rate: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EntityUsage {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            invocations: 0,
            successes: None,
            last_used_at: None,
            success_rate: 0.0,
            recommendations_made: 0,
            adoption_rate: 0.0,
            extra: Map::new(),
        }
    }

    /// Stored count, or one recovered from the rounded rate
    /// `(0.5 + successes) / (invocations + 1)`.
    pub fn success_count(&self) -> u64 {
        self.successes.unwrap_or_else(|| {
            let estimate = self.success_rate * (self.invocations + 1) as f64 - 0.5;
            (estimate.round().max(0.0) as u64).min(self.invocations)
        })
    }

    #[cfg(test)]
    pub fn with_invocations(mut self, invocations: u64) -> Self {
        self.invocations = invocations;
        self
    }

    #[cfg(test)]
    pub fn with_success_rate(mut self, success_rate: f64) -> Self {
        self.success_rate = success_rate;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingPeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub days: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TrackingPeriod {
    pub fn starting_at(at: DateTime<Utc>) -> Self {
        Self {
            start: at,
            end: at,
            days: 0,
            extra: Map::new(),
        }
    }

    pub fn extend_to(&mut self, at: DateTime<Utc>) {
        self.end = at;
        self.days = (self.end - self.start).num_days().max(0);
    }
}

/// Persisted usage snapshot, keyed by entity id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageState {
    #[serde(default, rename = "commands")]
    pub entities: BTreeMap<String, EntityUsage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_period: Option<TrackingPeriod>,
    /// Keys owned by other tools (`insights`, `lastUpdated`, ...), kept as read.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UsageState {
    #[cfg(test)]
    pub fn from_entities(entities: impl IntoIterator<Item = EntityUsage>) -> Self {
        Self {
            entities: entities
                .into_iter()
                .map(|entity| (entity.id.clone(), entity))
                .collect(),
            tracking_period: None,
            extra: Map::new(),
        }
    }

    /// Restores ids after deserialization, since they are stored as map keys.
    pub fn with_ids(mut self) -> Self {
        for (id, entity) in self.entities.iter_mut() {
            entity.id = id.clone();
        }
        self
    }
}
