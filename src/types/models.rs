use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

pub const INSUFFICIENT_DATA: &str = "insufficient_data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Success,
    Failure,
}

/// One line of the model task log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRecord {
    pub timestamp: String,
    pub model: String,
    pub task_type: String,
    pub status: TaskStatus,
    pub tokens: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelTaskStat {
    pub model: String,
    pub task_type: String,
    pub attempted: u64,
    pub succeeded: u64,
    pub tokens_used: u64,
}

pub(crate) fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Either a chosen model or the `insufficient_data` sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelPick {
    Model(String),
    InsufficientData,
}

impl ModelPick {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Model(name) => name,
            Self::InsufficientData => INSUFFICIENT_DATA,
        }
    }
}

impl From<Option<String>> for ModelPick {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::InsufficientData, Self::Model)
    }
}

impl Serialize for ModelPick {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskTypeSummary {
    pub attempted: u64,
    pub succeeded: u64,
    pub first_pass_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSummary {
    pub model: String,
    pub tasks_attempted: u64,
    pub tasks_succeeded: u64,
    pub first_pass_rate: f64,
    pub avg_tokens_used: f64,
    pub total_tokens_used: u64,
    pub task_types: BTreeMap<String, TaskTypeSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelComparison {
    pub best_per_task_type: BTreeMap<String, String>,
    pub most_token_efficient: ModelPick,
    pub highest_quality: ModelPick,
    pub models: Vec<ModelSummary>,
}
