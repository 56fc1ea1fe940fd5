use super::scoring::{Score, Threshold};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    Critical,
    Poor,
    Fair,
    Good,
    Excellent,
}

impl Level {
    /// Lower band bounds are inclusive: 2.0 is Poor, 8.0 is Excellent.
    pub fn from_score(score: f64) -> Self {
        if score < 2.0 {
            Self::Critical
        } else if score < 4.0 {
            Self::Poor
        } else if score < 6.0 {
            Self::Fair
        } else if score < 8.0 {
            Self::Good
        } else {
            Self::Excellent
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Critical => "Immediate intervention needed",
            Self::Poor => "Significant gaps, high risk",
            Self::Fair => "Basic processes in place",
            Self::Good => "Solid foundation, room to grow",
            Self::Excellent => "Mature, optimized system",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDimension {
    pub name: String,
    pub weight: f64,
    pub thresholds: Vec<Threshold>,
    pub raw_value: f64,
    pub score: Score,
    pub measured: bool,
    pub detail: String,
}

impl ScoredDimension {
    pub fn weighted(&self) -> f64 {
        f64::from(self.score) * self.weight
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaturityReport {
    pub overall_score: f64,
    pub level: Level,
    pub trend: Trend,
    pub dimensions: Vec<ScoredDimension>,
    pub computed_at: DateTime<Utc>,
}

impl MaturityReport {
    pub fn unmeasured(&self) -> impl Iterator<Item = &ScoredDimension> {
        self.dimensions.iter().filter(|dimension| !dimension.measured)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Cleanup,
    Consolidation,
    Adoption,
    Promotion,
}

impl Category {
    pub fn priority(self) -> Priority {
        match self {
            Self::Cleanup => Priority::Low,
            Self::Consolidation | Self::Promotion => Priority::Medium,
            Self::Adoption => Priority::High,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub category: Category,
    pub issue: String,
    pub suggestion: String,
    pub related_entities: Vec<String>,
}

impl Recommendation {
    pub fn new(
        category: Category,
        issue: impl Into<String>,
        suggestion: impl Into<String>,
        related_entities: Vec<String>,
    ) -> Self {
        Self {
            priority: category.priority(),
            category,
            issue: issue.into(),
            suggestion: suggestion.into(),
            related_entities,
        }
    }
}

/// Stable sort, highest priority first.
pub fn sort_recommendations(recommendations: &mut [Recommendation]) {
    recommendations.sort_by(|a, b| b.priority.cmp(&a.priority));
}
