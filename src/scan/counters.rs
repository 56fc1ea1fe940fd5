use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;

pub const DELEGATION_FILE: &str = "delegation.json";
pub const HOOK_ACTIVITY_FILE: &str = "hook-activity.json";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegationCounters {
    #[serde(default)]
    pub total_delegable_tasks: u64,
    #[serde(default)]
    pub tasks_delegated: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookActivity {
    #[serde(default)]
    pub aggregate_metrics: HookAggregate,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookAggregate {
    #[serde(default)]
    pub total_advice_given: u64,
    #[serde(default)]
    pub total_advice_followed: u64,
}

/// `Ok(None)` when the file does not exist yet.
pub fn read_json_if_exists<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&content)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn counters_parse_camel_case_files() {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = dir.path().join(HOOK_ACTIVITY_FILE);
        fs::write(
            &path,
            r#"{"aggregateMetrics": {"totalAdviceGiven": 10, "totalAdviceFollowed": 7}, "hooks": {}}"#,
        )
        .expect("write hook activity");

        let activity: HookActivity = read_json_if_exists(&path)
            .expect("read should succeed")
            .expect("file exists");
        assert_eq!(activity.aggregate_metrics.total_advice_given, 10);
        assert_eq!(activity.aggregate_metrics.total_advice_followed, 7);

        let missing: Option<DelegationCounters> =
            read_json_if_exists(&dir.path().join(DELEGATION_FILE)).expect("missing is ok");
        assert!(missing.is_none());
    }

    #[test]
    fn malformed_json_is_an_error() {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = dir.path().join(DELEGATION_FILE);
        fs::write(&path, "{not json").expect("write");
        let result: Result<Option<DelegationCounters>> = read_json_if_exists(&path);
        assert!(result.is_err());
    }
}
