use serde::Serialize;

pub fn to_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::maturity::aggregate;
    use crate::types::report::ScoredDimension;
    use crate::types::scoring::quintile_thresholds;

    #[test]
    fn json_report_contains_overall_score_and_detail() {
        let report = aggregate(
            vec![ScoredDimension {
                name: "Hook Adoption".to_string(),
                weight: 1.0,
                thresholds: quintile_thresholds(),
                raw_value: 0.0,
                score: 2,
                measured: false,
                detail: "No hook activity data available".to_string(),
            }],
            None,
        );

        let rendered = to_json(&report).expect("json should serialize");
        assert!(rendered.contains("\"overall_score\": 2.0"));
        assert!(rendered.contains("\"level\": \"Poor\""));
        assert!(rendered.contains("\"trend\": \"stable\""));
        assert!(rendered.contains("\"measured\": false"));
        assert!(rendered.contains("No hook activity data available"));
    }
}
