use super::scoring::{Threshold, ThresholdTable};
use crate::error::{MaturityError, Result};
use serde::{Deserialize, Serialize};

pub const WEIGHT_TOLERANCE: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    DelegationCompliance,
    ErrorRecurrence,
    DocumentationCoverage,
    TestCoverage,
    ContextFreshness,
    HookAdoption,
}

/// A raw value and how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricReading {
    pub value: f64,
    pub detail: String,
    pub measured: bool,
}

impl MetricReading {
    pub fn measured(value: f64, detail: impl Into<String>) -> Self {
        Self {
            value,
            detail: detail.into(),
            measured: true,
        }
    }

    /// The documented fallback when a source has nothing to report.
    pub fn missing(detail: impl Into<String>) -> Self {
        Self {
            value: 0.0,
            detail: detail.into(),
            measured: false,
        }
    }
}

/// A configured dimension whose table and weight have been checked.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionSpec {
    pub name: String,
    pub weight: f64,
    pub source: Option<MetricKind>,
    pub thresholds: ThresholdTable,
}

impl DimensionSpec {
    pub fn new(
        name: impl Into<String>,
        weight: f64,
        source: Option<MetricKind>,
        thresholds: Vec<Threshold>,
    ) -> Result<Self> {
        let name = name.into();
        if !(weight > 0.0 && weight <= 1.0) {
            return Err(MaturityError::InvalidWeights(format!(
                "weight for '{name}' must be in (0, 1] (found {weight})"
            )));
        }
        let thresholds = ThresholdTable::new(&name, thresholds)?;
        Ok(Self {
            name,
            weight,
            source,
            thresholds,
        })
    }
}

pub fn validate_weight_sum(specs: &[DimensionSpec]) -> Result<()> {
    if specs.is_empty() {
        return Err(MaturityError::InvalidWeights(
            "at least one dimension is required".to_string(),
        ));
    }
    let sum: f64 = specs.iter().map(|spec| spec.weight).sum();
    if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
        return Err(MaturityError::InvalidWeights(format!(
            "weights must sum to 1.0 (found {sum:.3})"
        )));
    }
    let mut names = std::collections::HashSet::new();
    for spec in specs {
        if !names.insert(spec.name.as_str()) {
            return Err(MaturityError::InvalidWeights(format!(
                "dimension '{}' is configured twice",
                spec.name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::scoring::quintile_thresholds;

    #[test]
    fn spec_rejects_zero_weight() {
        let err = DimensionSpec::new("Zero", 0.0, None, quintile_thresholds())
            .expect_err("zero weight should fail");
        assert!(matches!(err, MaturityError::InvalidWeights(_)));
    }

    #[test]
    fn weight_sum_must_be_one() {
        let specs = vec![
            DimensionSpec::new("A", 0.5, None, quintile_thresholds()).expect("spec"),
            DimensionSpec::new("B", 0.4, None, quintile_thresholds()).expect("spec"),
        ];
        let err = validate_weight_sum(&specs).expect_err("0.9 should fail");
        assert!(err.to_string().contains("found 0.900"));
    }

    #[test]
    fn weight_sum_tolerates_rounding() {
        let specs = vec![
            DimensionSpec::new("A", 0.3334, None, quintile_thresholds()).expect("spec"),
            DimensionSpec::new("B", 0.3333, None, quintile_thresholds()).expect("spec"),
            DimensionSpec::new("C", 0.3333, None, quintile_thresholds()).expect("spec"),
        ];
        assert!(validate_weight_sum(&specs).is_ok());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let specs = vec![
            DimensionSpec::new("A", 0.5, None, quintile_thresholds()).expect("spec"),
            DimensionSpec::new("A", 0.5, None, quintile_thresholds()).expect("spec"),
        ];
        assert!(validate_weight_sum(&specs).is_err());
    }
}
