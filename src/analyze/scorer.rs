use crate::types::scoring::{Score, Threshold};

/// Quantizes `value` with an ascending threshold table.
///
/// Returns the score of the first entry whose upper bound is not below the
/// value, or the last entry's score when the value exceeds every bound.
/// The table is assumed to be validated; an empty table scores 0.
pub fn score(value: f64, thresholds: &[Threshold]) -> Score {
    thresholds
        .iter()
        .find(|threshold| value <= threshold.upper)
        .or_else(|| thresholds.last())
        .map_or(0, |threshold| threshold.score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::scoring::quintile_thresholds;

    fn test_coverage_table() -> Vec<Threshold> {
        vec![
            Threshold::new(0.60, 2),
            Threshold::new(0.70, 4),
            Threshold::new(0.80, 6),
            Threshold::new(0.90, 8),
            Threshold::new(1.00, 10),
        ]
    }

    #[test]
    fn test_coverage_example_scores_eight() {
        assert_eq!(score(0.82, &test_coverage_table()), 8);
    }

    #[test]
    fn bounds_are_inclusive() {
        let table = test_coverage_table();
        assert_eq!(score(0.60, &table), 2);
        assert_eq!(score(0.6000001, &table), 4);
        assert_eq!(score(1.00, &table), 10);
    }

    #[test]
    fn values_above_every_bound_clamp_to_last_score() {
        assert_eq!(score(1.04, &test_coverage_table()), 10);
        assert_eq!(score(f64::MAX, &quintile_thresholds()), 10);

        let capped = vec![Threshold::new(0.5, 3), Threshold::new(0.9, 7)];
        assert_eq!(score(2.0, &capped), 7);
    }

    #[test]
    fn negative_values_land_in_lowest_band() {
        assert_eq!(score(-0.3, &quintile_thresholds()), 2);
    }

    #[test]
    fn score_is_monotonic_across_tables() {
        let tables = [
            quintile_thresholds(),
            test_coverage_table(),
            vec![Threshold::new(3.0, 10), Threshold::new(8.0, 10), Threshold::new(30.0, 10)],
            vec![Threshold::new(-1.0, 0), Threshold::new(0.0, 1), Threshold::new(5.0, 9)],
        ];
        for table in &tables {
            let mut previous = score(-2.0, table);
            for step in -200..=300 {
                let value = f64::from(step) * 0.01;
                let current = score(value, table);
                assert!(current >= previous, "score decreased at {value}");
                previous = current;
            }
        }
    }

    #[test]
    fn empty_table_scores_zero() {
        assert_eq!(score(0.5, &[]), 0);
    }
}
