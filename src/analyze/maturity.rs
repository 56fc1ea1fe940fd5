use super::scorer::score;
use crate::scan::MetricSource;
use crate::types::metrics::{DimensionSpec, MetricReading};
use crate::types::report::{Level, MaturityReport, ScoredDimension, Trend};
use chrono::Utc;

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

pub fn score_dimension(spec: &DimensionSpec, reading: MetricReading) -> ScoredDimension {
    let thresholds = spec.thresholds.as_slice();
    ScoredDimension {
        name: spec.name.clone(),
        weight: spec.weight,
        thresholds: thresholds.to_vec(),
        raw_value: reading.value,
        score: score(reading.value, thresholds),
        measured: reading.measured,
        detail: reading.detail,
    }
}

/// Combines scored dimensions into a report.
///
/// The overall score is the weighted mean rounded to one decimal, so only
/// relative weights matter. Trend is `stable` unless a previous report is
/// supplied to compare against.
pub fn aggregate(
    dimensions: Vec<ScoredDimension>,
    previous: Option<&MaturityReport>,
) -> MaturityReport {
    let total_weight = dimensions.iter().map(|dimension| dimension.weight).sum::<f64>();
    let weighted = dimensions.iter().map(ScoredDimension::weighted).sum::<f64>();
    let overall_score = if total_weight > 0.0 {
        round_to(weighted / total_weight, 1)
    } else {
        0.0
    };
    let trend = match previous {
        Some(previous) if overall_score > previous.overall_score => Trend::Improving,
        Some(previous) if overall_score < previous.overall_score => Trend::Declining,
        _ => Trend::Stable,
    };

    MaturityReport {
        overall_score,
        level: Level::from_score(overall_score),
        trend,
        dimensions,
        computed_at: Utc::now(),
    }
}

/// Reads every dimension once and aggregates. A failing source never aborts
/// the run: its dimension is scored from the missing-data default.
pub fn compute_maturity_report(
    specs: &[DimensionSpec],
    source: &dyn MetricSource,
    previous: Option<&MaturityReport>,
) -> MaturityReport {
    let dimensions = specs
        .iter()
        .map(|spec| {
            let reading = source.load_metric_value(spec).unwrap_or_else(|error| {
                tracing::warn!(dimension = %spec.name, %error, "metric unavailable");
                MetricReading::missing(error.to_string())
            });
            let scored = score_dimension(spec, reading);
            tracing::debug!(
                dimension = %scored.name,
                raw = scored.raw_value,
                score = scored.score,
                measured = scored.measured,
                "scored dimension"
            );
            scored
        })
        .collect();

    let report = aggregate(dimensions, previous);
    tracing::info!(
        overall = report.overall_score,
        level = ?report.level,
        trend = ?report.trend,
        "maturity report computed"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MaturityError, Result};
    use crate::scan::FixedMetricSource;
    use crate::types::config::MaturityConfig;
    use crate::types::scoring::quintile_thresholds;

    fn scored(name: &str, score: u8, weight: f64) -> ScoredDimension {
        ScoredDimension {
            name: name.to_string(),
            weight,
            thresholds: quintile_thresholds(),
            raw_value: 0.0,
            score,
            measured: true,
            detail: String::new(),
        }
    }

    fn report_with(overall: f64) -> MaturityReport {
        MaturityReport {
            overall_score: overall,
            level: Level::from_score(overall),
            trend: Trend::Stable,
            dimensions: vec![],
            computed_at: Utc::now(),
        }
    }

    #[test]
    fn aggregate_rounds_weighted_sum_to_one_decimal() {
        let report = aggregate(
            vec![
                scored("a", 8, 0.25),
                scored("b", 6, 0.20),
                scored("c", 4, 0.15),
                scored("d", 8, 0.15),
                scored("e", 2, 0.15),
                scored("f", 10, 0.10),
            ],
            None,
        );
        // 2.0 + 1.2 + 0.6 + 1.2 + 0.3 + 1.0
        assert_eq!(report.overall_score, 6.3);
        assert_eq!(report.level, Level::Good);
        assert_eq!(report.trend, Trend::Stable);
    }

    #[test]
    fn aggregate_depends_only_on_weighted_scores() {
        let forward = aggregate(vec![scored("a", 10, 0.7), scored("b", 2, 0.3)], None);
        let reversed = aggregate(vec![scored("b", 2, 0.3), scored("a", 10, 0.7)], None);
        assert_eq!(forward.overall_score, reversed.overall_score);
        assert_eq!(forward.overall_score, 7.6);
    }

    #[test]
    fn aggregate_uses_relative_weights_only() {
        let scores = [("a", 8), ("b", 6), ("c", 4), ("d", 10)];
        let base = [0.4, 0.3, 0.2, 0.1];
        let report_for = |factor: f64| {
            let dimensions = scores
                .iter()
                .zip(base)
                .map(|((name, score), weight)| scored(name, *score, weight * factor))
                .collect();
            aggregate(dimensions, None).overall_score
        };

        // 3.2 + 1.8 + 0.8 + 1.0
        assert_eq!(report_for(1.0), 6.8);
        for factor in [0.5, 2.0, 0.25, 10.0] {
            assert_eq!(report_for(factor), 6.8, "factor {factor}");
        }
    }

    #[test]
    fn aggregate_without_dimensions_is_zero() {
        let report = aggregate(vec![], None);
        assert_eq!(report.overall_score, 0.0);
        assert_eq!(report.level, Level::Critical);
    }

    #[test]
    fn aggregate_at_band_boundary_is_poor() {
        let report = aggregate(vec![scored("only", 2, 1.0)], None);
        assert_eq!(report.overall_score, 2.0);
        assert_eq!(report.level, Level::Poor);
    }

    #[test]
    fn trend_compares_against_previous_report() {
        let dims = || vec![scored("only", 6, 1.0)];
        assert_eq!(
            aggregate(dims(), Some(&report_with(5.0))).trend,
            Trend::Improving
        );
        assert_eq!(
            aggregate(dims(), Some(&report_with(7.5))).trend,
            Trend::Declining
        );
        assert_eq!(aggregate(dims(), Some(&report_with(6.0))).trend, Trend::Stable);
    }

    struct FailingSource;

    impl MetricSource for FailingSource {
        fn load_metric_value(&self, spec: &DimensionSpec) -> Result<MetricReading> {
            if spec.name == "Test Coverage" {
                Ok(MetricReading::measured(0.82, "Test coverage: 82.0%"))
            } else {
                Err(MaturityError::MissingData(format!(
                    "no data for {}",
                    spec.name
                )))
            }
        }
    }

    #[test]
    fn failing_dimensions_are_kept_with_their_detail() {
        let specs = MaturityConfig::default()
            .dimension_specs()
            .expect("defaults should validate");
        let report = compute_maturity_report(&specs, &FailingSource, None);

        assert_eq!(report.dimensions.len(), specs.len());
        let coverage = report
            .dimensions
            .iter()
            .find(|dimension| dimension.name == "Test Coverage")
            .expect("coverage dimension present");
        assert_eq!(coverage.score, 8);
        assert!(coverage.measured);

        let delegation = &report.dimensions[0];
        assert!(!delegation.measured);
        assert_eq!(delegation.raw_value, 0.0);
        assert_eq!(delegation.score, 2);
        assert!(delegation.detail.contains("no data for Delegation Compliance"));
        assert_eq!(report.unmeasured().count(), 5);
    }

    #[test]
    fn missing_data_drags_score_down() {
        let specs = MaturityConfig::default()
            .dimension_specs()
            .expect("defaults should validate");
        let all = FixedMetricSource::from_values(
            specs.iter().map(|spec| (spec.name.clone(), 1.0)),
        );
        let full = compute_maturity_report(&specs, &all, None);
        assert_eq!(full.overall_score, 10.0);
        assert_eq!(full.level, Level::Excellent);

        let partial = FixedMetricSource::from_values([("Delegation Compliance".to_string(), 1.0)]);
        let report = compute_maturity_report(&specs, &partial, None);
        // 10 * 0.25 + 2 * 0.75
        assert_eq!(report.overall_score, 4.0);
        assert_eq!(report.level, Level::Fair);
    }
}
