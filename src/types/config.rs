use super::metrics::{validate_weight_sum, DimensionSpec, MetricKind};
use super::scoring::{quintile_thresholds, Threshold};
use crate::error::{MaturityError, Result};
use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MaturityConfig {
    pub project: Option<ProjectConfig>,
    pub paths: Option<PathsConfig>,
    #[serde(default)]
    pub dimensions: Vec<DimensionConfig>,
    pub usage: Option<UsageConfig>,
    pub models: Option<ModelsConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    pub metrics_dir: Option<String>,
    pub context_dir: Option<String>,
    pub src_dir: Option<String>,
    pub tests_dir: Option<String>,
    pub lookback_days: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DimensionConfig {
    pub name: String,
    pub weight: f64,
    pub source: Option<MetricKind>,
    #[serde(default = "quintile_thresholds")]
    pub thresholds: Vec<Threshold>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UsageConfig {
    pub families: Option<Vec<FamilyConfig>>,
    pub advisors: Option<Vec<String>>,
    pub adoption_threshold: Option<f64>,
    pub promotion_success_threshold: Option<f64>,
    pub promotion_max_invocations: Option<u64>,
    pub most_used_limit: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FamilyConfig {
    pub prefix: String,
    pub below: u64,
    #[serde(default = "default_min_members")]
    pub min_members: usize,
    pub reason: Option<String>,
    pub suggestion: Option<String>,
}

fn default_min_members() -> usize {
    2
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelsConfig {
    pub min_quality_attempts: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub metrics_dir: String,
    pub context_dir: String,
    pub src_dir: String,
    pub tests_dir: String,
    pub lookback_days: u32,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            metrics_dir: ".claude/metrics".to_string(),
            context_dir: ".claude/context".to_string(),
            src_dir: "src".to_string(),
            tests_dir: "tests".to_string(),
            lookback_days: 30,
        }
    }
}

/// A naming family whose low-usage members may be merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedundancyFamily {
    pub prefix: String,
    pub below: u64,
    pub min_members: usize,
    pub reason: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UsagePolicy {
    pub families: Vec<RedundancyFamily>,
    pub advisors: Vec<String>,
    pub adoption_threshold: f64,
    pub promotion_success_threshold: f64,
    pub promotion_max_invocations: u64,
    pub most_used_limit: usize,
}

impl Default for UsagePolicy {
    fn default() -> Self {
        Self {
            families: vec![
                RedundancyFamily {
                    prefix: "/local-".to_string(),
                    below: 5,
                    min_members: 2,
                    reason: "Multiple /local-* commands with low usage, consider consolidation"
                        .to_string(),
                    suggestion: "Merge into /delegate-auto with auto-routing".to_string(),
                },
                RedundancyFamily {
                    prefix: "/process-".to_string(),
                    below: 3,
                    min_members: 3,
                    reason: "Multiple specialized process commands rarely used".to_string(),
                    suggestion: "Consider consolidating related functions".to_string(),
                },
            ],
            advisors: vec!["/route".to_string()],
            adoption_threshold: 0.30,
            promotion_success_threshold: 0.80,
            promotion_max_invocations: 5,
            most_used_limit: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonPolicy {
    /// Models need strictly more attempts than this to be ranked on quality.
    pub min_quality_attempts: u64,
}

impl Default for ComparisonPolicy {
    fn default() -> Self {
        Self {
            min_quality_attempts: 5,
        }
    }
}

pub fn default_dimensions() -> Vec<DimensionConfig> {
    let dimension = |name: &str, weight: f64, source: MetricKind, thresholds: Vec<Threshold>| {
        DimensionConfig {
            name: name.to_string(),
            weight,
            source: Some(source),
            thresholds,
        }
    };
    vec![
        dimension(
            "Delegation Compliance",
            0.25,
            MetricKind::DelegationCompliance,
            quintile_thresholds(),
        ),
        dimension(
            "Error Recurrence",
            0.20,
            MetricKind::ErrorRecurrence,
            quintile_thresholds(),
        ),
        dimension(
            "Documentation Coverage",
            0.15,
            MetricKind::DocumentationCoverage,
            vec![
                Threshold::new(0.40, 2),
                Threshold::new(0.60, 4),
                Threshold::new(0.75, 6),
                Threshold::new(0.90, 8),
                Threshold::new(1.00, 10),
            ],
        ),
        dimension(
            "Test Coverage",
            0.15,
            MetricKind::TestCoverage,
            vec![
                Threshold::new(0.60, 2),
                Threshold::new(0.70, 4),
                Threshold::new(0.80, 6),
                Threshold::new(0.90, 8),
                Threshold::new(1.00, 10),
            ],
        ),
        dimension(
            "Context Freshness",
            0.15,
            MetricKind::ContextFreshness,
            quintile_thresholds(),
        ),
        dimension(
            "Hook Adoption",
            0.10,
            MetricKind::HookAdoption,
            quintile_thresholds(),
        ),
    ]
}

impl MaturityConfig {
    /// Validated dimension specs; the built-in six when none are configured.
    pub fn dimension_specs(&self) -> Result<Vec<DimensionSpec>> {
        let configured = if self.dimensions.is_empty() {
            default_dimensions()
        } else {
            self.dimensions.clone()
        };
        let specs = configured
            .into_iter()
            .map(|dimension| {
                DimensionSpec::new(
                    dimension.name,
                    dimension.weight,
                    dimension.source,
                    dimension.thresholds,
                )
            })
            .collect::<Result<Vec<_>>>()?;
        validate_weight_sum(&specs)?;
        Ok(specs)
    }

    pub fn paths(&self) -> Paths {
        let defaults = Paths::default();
        match &self.paths {
            Some(paths) => Paths {
                metrics_dir: paths.metrics_dir.clone().unwrap_or(defaults.metrics_dir),
                context_dir: paths.context_dir.clone().unwrap_or(defaults.context_dir),
                src_dir: paths.src_dir.clone().unwrap_or(defaults.src_dir),
                tests_dir: paths.tests_dir.clone().unwrap_or(defaults.tests_dir),
                lookback_days: paths.lookback_days.unwrap_or(defaults.lookback_days),
            },
            None => defaults,
        }
    }

    pub fn usage_policy(&self) -> UsagePolicy {
        let defaults = UsagePolicy::default();
        let Some(usage) = &self.usage else {
            return defaults;
        };
        let families = match &usage.families {
            Some(families) => families
                .iter()
                .map(|family| RedundancyFamily {
                    prefix: family.prefix.clone(),
                    below: family.below,
                    min_members: family.min_members,
                    reason: family.reason.clone().unwrap_or_else(|| {
                        format!("Multiple {}* entries with low usage", family.prefix)
                    }),
                    suggestion: family
                        .suggestion
                        .clone()
                        .unwrap_or_else(|| "Consider consolidating related entries".to_string()),
                })
                .collect(),
            None => defaults.families,
        };
        UsagePolicy {
            families,
            advisors: usage.advisors.clone().unwrap_or(defaults.advisors),
            adoption_threshold: usage
                .adoption_threshold
                .unwrap_or(defaults.adoption_threshold),
            promotion_success_threshold: usage
                .promotion_success_threshold
                .unwrap_or(defaults.promotion_success_threshold),
            promotion_max_invocations: usage
                .promotion_max_invocations
                .unwrap_or(defaults.promotion_max_invocations),
            most_used_limit: usage.most_used_limit.unwrap_or(defaults.most_used_limit),
        }
    }

    pub fn comparison_policy(&self) -> ComparisonPolicy {
        let defaults = ComparisonPolicy::default();
        ComparisonPolicy {
            min_quality_attempts: self
                .models
                .as_ref()
                .and_then(|models| models.min_quality_attempts)
                .unwrap_or(defaults.min_quality_attempts),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.dimension_specs()?;

        if let Some(paths) = &self.paths {
            if paths.lookback_days == Some(0) {
                return Err(MaturityError::ConfigParse(
                    "paths.lookback_days must be greater than 0".to_string(),
                ));
            }
        }

        if let Some(usage) = &self.usage {
            for (key, value) in [
                ("usage.adoption_threshold", usage.adoption_threshold),
                (
                    "usage.promotion_success_threshold",
                    usage.promotion_success_threshold,
                ),
            ] {
                if let Some(value) = value {
                    if !(0.0..=1.0).contains(&value) {
                        return Err(MaturityError::ConfigParse(format!(
                            "{key} must be between 0.0 and 1.0"
                        )));
                    }
                }
            }
            if usage.most_used_limit == Some(0) {
                return Err(MaturityError::ConfigParse(
                    "usage.most_used_limit must be greater than 0".to_string(),
                ));
            }
            if let Some(families) = &usage.families {
                validate_families(families)?;
            }
        }

        Ok(())
    }
}

fn validate_families(families: &[FamilyConfig]) -> Result<()> {
    let mut seen = HashSet::new();
    for family in families {
        let prefix = family.prefix.trim();
        if prefix.is_empty() {
            return Err(MaturityError::ConfigParse(
                "usage.families entries must have a non-empty prefix".to_string(),
            ));
        }
        if !seen.insert(prefix.to_string()) {
            return Err(MaturityError::ConfigParse(format!(
                "usage.families contains duplicate prefix: {prefix}"
            )));
        }
        if family.min_members < 2 {
            return Err(MaturityError::ConfigParse(format!(
                "usage.families '{prefix}' min_members must be at least 2"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_default_dimensions() {
        let cfg: MaturityConfig = toml::from_str("").expect("empty config should parse");
        let specs = cfg.dimension_specs().expect("defaults should validate");
        assert_eq!(specs.len(), 6);
        assert_eq!(specs[0].name, "Delegation Compliance");
        let sum: f64 = specs.iter().map(|spec| spec.weight).sum();
        assert!((sum - 1.0).abs() < 0.001);
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
[project]
name = "sample"

[paths]
metrics_dir = "metrics"
lookback_days = 14

[[dimensions]]
name = "Test Coverage"
weight = 0.6
source = "test_coverage"
thresholds = [
  { upper = 0.6, score = 2 },
  { upper = 1, score = 10 },
]

[[dimensions]]
name = "Hook Adoption"
weight = 0.4
source = "hook_adoption"

[usage]
advisors = ["/route", "/suggest"]
adoption_threshold = 0.5

[[usage.families]]
prefix = "/gen-"
below = 2
min_members = 3

[models]
min_quality_attempts = 10
"#;
        let cfg: MaturityConfig = toml::from_str(toml_str).expect("full config should parse");
        cfg.validate().expect("config should validate");

        let specs = cfg.dimension_specs().expect("specs should build");
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].source, Some(MetricKind::TestCoverage));
        assert_eq!(specs[0].thresholds.as_slice()[1], Threshold::new(1.0, 10));
        assert_eq!(specs[1].thresholds.as_slice().len(), 5);

        let paths = cfg.paths();
        assert_eq!(paths.metrics_dir, "metrics");
        assert_eq!(paths.context_dir, ".claude/context");
        assert_eq!(paths.lookback_days, 14);

        let policy = cfg.usage_policy();
        assert_eq!(policy.advisors, vec!["/route", "/suggest"]);
        assert_eq!(policy.adoption_threshold, 0.5);
        assert_eq!(policy.promotion_max_invocations, 5);
        assert_eq!(policy.families.len(), 1);
        assert_eq!(policy.families[0].prefix, "/gen-");
        assert_eq!(policy.families[0].min_members, 3);

        assert_eq!(cfg.comparison_policy().min_quality_attempts, 10);
    }

    #[test]
    fn validate_rejects_invalid_weight_sum() {
        let toml_str = r#"
[[dimensions]]
name = "A"
weight = 0.9

[[dimensions]]
name = "B"
weight = 0.9
"#;
        let cfg: MaturityConfig = toml::from_str(toml_str).expect("config should parse");
        let err = cfg.validate().expect_err("validation should fail");
        assert!(matches!(err, MaturityError::InvalidWeights(_)));
        assert!(err.is_malformed_input());
    }

    #[test]
    fn validate_rejects_unsorted_thresholds() {
        let toml_str = r#"
[[dimensions]]
name = "Only"
weight = 1.0
thresholds = [{ upper = 0.8, score = 4 }, { upper = 0.4, score = 8 }]
"#;
        let cfg: MaturityConfig = toml::from_str(toml_str).expect("config should parse");
        let err = cfg.validate().expect_err("validation should fail");
        assert!(matches!(err, MaturityError::MalformedThresholds { .. }));
        assert!(err.to_string().contains("Only"));
    }

    #[test]
    fn validate_rejects_small_family() {
        let toml_str = r#"
[[usage.families]]
prefix = "/x-"
below = 3
min_members = 1
"#;
        let cfg: MaturityConfig = toml::from_str(toml_str).expect("config should parse");
        let err = cfg.validate().expect_err("validation should fail");
        assert!(err.to_string().contains("min_members must be at least 2"));
    }

    #[test]
    fn validate_rejects_out_of_range_threshold() {
        let toml_str = r#"
[usage]
adoption_threshold = 1.5
"#;
        let cfg: MaturityConfig = toml::from_str(toml_str).expect("config should parse");
        let err = cfg.validate().expect_err("validation should fail");
        assert!(err.to_string().contains("usage.adoption_threshold"));
    }

    #[test]
    fn defaults_when_sections_missing() {
        let cfg = MaturityConfig::default();
        assert_eq!(cfg.paths(), Paths::default());
        assert_eq!(cfg.usage_policy(), UsagePolicy::default());
        assert_eq!(cfg.comparison_policy().min_quality_attempts, 5);
    }
}
