use crate::error::{MaturityError, Result};
use serde::{Deserialize, Serialize};

pub type Score = u8;

pub const MAX_SCORE: Score = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub upper: f64,
    pub score: Score,
}

impl Threshold {
    pub const fn new(upper: f64, score: Score) -> Self {
        Self { upper, score }
    }
}

/// Threshold table that passed the ordering checks.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ThresholdTable(Vec<Threshold>);

impl ThresholdTable {
    pub fn new(dimension: &str, thresholds: Vec<Threshold>) -> Result<Self> {
        let malformed = |reason: String| MaturityError::MalformedThresholds {
            dimension: dimension.to_string(),
            reason,
        };

        if thresholds.is_empty() {
            return Err(malformed("table is empty".to_string()));
        }
        for threshold in &thresholds {
            if !threshold.upper.is_finite() {
                return Err(malformed(format!(
                    "upper bound {} is not finite",
                    threshold.upper
                )));
            }
            if threshold.score > MAX_SCORE {
                return Err(malformed(format!(
                    "score {} exceeds {MAX_SCORE}",
                    threshold.score
                )));
            }
        }
        for pair in thresholds.windows(2) {
            if pair[1].upper <= pair[0].upper {
                return Err(malformed(format!(
                    "upper bounds must be strictly ascending ({} then {})",
                    pair[0].upper, pair[1].upper
                )));
            }
            if pair[1].score < pair[0].score {
                return Err(malformed(format!(
                    "scores must not decrease ({} then {})",
                    pair[0].score, pair[1].score
                )));
            }
        }
        Ok(Self(thresholds))
    }

    pub fn as_slice(&self) -> &[Threshold] {
        &self.0
    }
}

/// The table most ratio dimensions share.
pub fn quintile_thresholds() -> Vec<Threshold> {
    vec![
        Threshold::new(0.20, 2),
        Threshold::new(0.40, 4),
        Threshold::new(0.60, 6),
        Threshold::new(0.80, 8),
        Threshold::new(1.00, 10),
    ]
}
