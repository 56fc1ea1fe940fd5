pub mod counters;
pub mod docs;
pub mod filesystem;
pub mod git_meta;
pub mod task_log;

use crate::error::{MaturityError, Result};
use crate::types::config::Paths;
use crate::types::metrics::{DimensionSpec, MetricKind, MetricReading};
use counters::{
    read_json_if_exists, DelegationCounters, HookActivity, DELEGATION_FILE, HOOK_ACTIVITY_FILE,
};
use filesystem::{is_test_file, list_source_files};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Supplies the raw value for one dimension per run.
pub trait MetricSource {
    fn load_metric_value(&self, dimension: &DimensionSpec) -> Result<MetricReading>;
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum FixedValue {
    Bare(f64),
    Detailed { value: f64, detail: Option<String> },
}

/// Pre-extracted values keyed by dimension name.
#[derive(Debug, Clone, Default)]
pub struct FixedMetricSource {
    values: HashMap<String, MetricReading>,
}

impl FixedMetricSource {
    #[cfg(test)]
    pub fn from_values(values: impl IntoIterator<Item = (String, f64)>) -> Self {
        Self {
            values: values
                .into_iter()
                .map(|(name, value)| {
                    let reading = MetricReading::measured(value, "supplied value");
                    (name, reading)
                })
                .collect(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let raw: HashMap<String, FixedValue> = serde_json::from_str(&content)?;
        let values = raw
            .into_iter()
            .map(|(name, value)| {
                let reading = match value {
                    FixedValue::Bare(value) => MetricReading::measured(value, "supplied value"),
                    FixedValue::Detailed { value, detail } => MetricReading::measured(
                        value,
                        detail.unwrap_or_else(|| "supplied value".to_string()),
                    ),
                };
                (name, reading)
            })
            .collect();
        Ok(Self { values })
    }

    pub fn get(&self, name: &str) -> Option<&MetricReading> {
        self.values.get(name)
    }
}

impl MetricSource for FixedMetricSource {
    fn load_metric_value(&self, dimension: &DimensionSpec) -> Result<MetricReading> {
        self.get(&dimension.name).cloned().ok_or_else(|| {
            MaturityError::MissingData(format!("no value supplied for {}", dimension.name))
        })
    }
}

/// Collects the built-in metric kinds from a repository checkout.
#[derive(Debug, Clone)]
pub struct RepoMetricSource {
    root: PathBuf,
    paths: Paths,
}

impl RepoMetricSource {
    pub fn new(root: &Path, paths: Paths) -> Self {
        Self {
            root: root.to_path_buf(),
            paths,
        }
    }

    fn resolve(&self, relative: &str) -> PathBuf {
        let candidate = PathBuf::from(relative);
        if candidate.is_absolute() {
            candidate
        } else {
            self.root.join(candidate)
        }
    }

    pub fn read(&self, kind: MetricKind) -> Result<MetricReading> {
        match kind {
            MetricKind::DelegationCompliance => self.delegation_compliance(),
            MetricKind::ErrorRecurrence => self.error_recurrence(),
            MetricKind::DocumentationCoverage => self.documentation_coverage(),
            MetricKind::TestCoverage => self.test_coverage(),
            MetricKind::ContextFreshness => self.context_freshness(),
            MetricKind::HookAdoption => self.hook_adoption(),
        }
    }

    fn delegation_compliance(&self) -> Result<MetricReading> {
        let path = self.resolve(&self.paths.metrics_dir).join(DELEGATION_FILE);
        let Some(counters) = read_json_if_exists::<DelegationCounters>(&path)? else {
            return Ok(MetricReading::missing("No delegation data available"));
        };
        if counters.total_delegable_tasks == 0 {
            return Ok(MetricReading::missing("No delegable tasks recorded"));
        }
        let rate = counters.tasks_delegated as f64 / counters.total_delegable_tasks as f64;
        Ok(MetricReading::measured(
            rate,
            format!(
                "{}/{} tasks delegated ({:.0}%)",
                counters.tasks_delegated,
                counters.total_delegable_tasks,
                rate * 100.0
            ),
        ))
    }

    fn error_recurrence(&self) -> Result<MetricReading> {
        let log = git_meta::fix_commit_log(&self.root, self.paths.lookback_days)?;
        let fixes = git_meta::fixes_per_file(&log);
        if fixes.is_empty() {
            return Ok(MetricReading::missing(format!(
                "No fix commits in last {} days",
                self.paths.lookback_days
            )));
        }
        let total = fixes.len();
        let recurring = fixes.values().filter(|count| **count > 1).count();
        let recurrence = recurring as f64 / total as f64;
        Ok(MetricReading::measured(
            1.0 - recurrence,
            format!(
                "{recurring}/{total} files had recurring errors ({:.0}%)",
                recurrence * 100.0
            ),
        ))
    }

    fn documentation_coverage(&self) -> Result<MetricReading> {
        let coverage = docs::scan_doc_coverage(&self.resolve(&self.paths.src_dir));
        if coverage.exported == 0 {
            return Ok(MetricReading::missing("No exported functions found"));
        }
        let ratio = coverage.documented as f64 / coverage.exported as f64;
        Ok(MetricReading::measured(
            ratio,
            format!(
                "{}/{} exports documented ({:.0}%)",
                coverage.documented,
                coverage.exported,
                ratio * 100.0
            ),
        ))
    }

    /// File-count estimate; real coverage figures come in through
    /// pre-extracted values.
    fn test_coverage(&self) -> Result<MetricReading> {
        let src_files = list_source_files(&self.resolve(&self.paths.src_dir));
        let tests_dir_files = list_source_files(&self.resolve(&self.paths.tests_dir));
        let test_files = src_files
            .iter()
            .chain(&tests_dir_files)
            .filter(|path| is_test_file(path))
            .count();
        let source_files = src_files.iter().filter(|path| !is_test_file(path)).count();

        if source_files == 0 {
            return Ok(MetricReading::missing("No source files found"));
        }
        let estimate = (test_files as f64 / source_files as f64).min(1.0);
        Ok(MetricReading::measured(
            estimate,
            format!(
                "Estimated coverage: {:.0}% ({test_files} test files for {source_files} source files)",
                estimate * 100.0
            ),
        ))
    }

    fn context_freshness(&self) -> Result<MetricReading> {
        let context_dir = self.resolve(&self.paths.context_dir);
        let context_files = std::fs::read_dir(&context_dir)
            .map(|entries| {
                entries
                    .filter_map(|entry| entry.ok())
                    .map(|entry| entry.path())
                    .filter(|path| path.is_file())
                    .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("md"))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        if context_files.is_empty() {
            return Ok(MetricReading::missing("No context files found"));
        }

        let ages = context_files
            .iter()
            .filter_map(|path| path.strip_prefix(&self.root).ok())
            .filter_map(|relative| {
                git_meta::last_commit_unix(&self.root, &relative.to_string_lossy())
            })
            .map(git_meta::age_days)
            .collect::<Vec<_>>();
        if ages.is_empty() {
            return Ok(MetricReading::missing("Could not determine context file dates"));
        }

        let avg_age_days = ages.iter().sum::<i64>() as f64 / ages.len() as f64;
        Ok(MetricReading::measured(
            freshness_from_age(avg_age_days),
            format!("Context files avg {avg_age_days:.0} days old"),
        ))
    }

    fn hook_adoption(&self) -> Result<MetricReading> {
        let path = self.resolve(&self.paths.metrics_dir).join(HOOK_ACTIVITY_FILE);
        let Some(activity) = read_json_if_exists::<HookActivity>(&path)? else {
            return Ok(MetricReading::missing("No hook activity data available"));
        };
        let given = activity.aggregate_metrics.total_advice_given;
        let followed = activity.aggregate_metrics.total_advice_followed;
        if given == 0 {
            return Ok(MetricReading::missing("No hook advice given yet"));
        }
        let rate = followed as f64 / given as f64;
        Ok(MetricReading::measured(
            rate,
            format!(
                "{followed}/{given} hook advice followed ({:.0}%)",
                rate * 100.0
            ),
        ))
    }
}

impl MetricSource for RepoMetricSource {
    fn load_metric_value(&self, dimension: &DimensionSpec) -> Result<MetricReading> {
        match dimension.source {
            Some(kind) => self.read(kind),
            None => Err(MaturityError::MissingData(format!(
                "no source configured for {}",
                dimension.name
            ))),
        }
    }
}

/// Supplied values first, repository collectors for the rest.
pub struct LayeredSource<'a> {
    pub overrides: Option<&'a FixedMetricSource>,
    pub fallback: &'a dyn MetricSource,
}

impl MetricSource for LayeredSource<'_> {
    fn load_metric_value(&self, dimension: &DimensionSpec) -> Result<MetricReading> {
        match self.overrides.and_then(|values| values.get(&dimension.name)) {
            Some(reading) => Ok(reading.clone()),
            None => self.fallback.load_metric_value(dimension),
        }
    }
}

/// Age bands for context files.
pub fn freshness_from_age(avg_age_days: f64) -> f64 {
    if avg_age_days < 3.0 {
        1.0
    } else if avg_age_days < 8.0 {
        0.8
    } else if avg_age_days < 15.0 {
        0.6
    } else if avg_age_days < 30.0 {
        0.4
    } else {
        0.2
    }
}
