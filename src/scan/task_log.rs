use crate::error::Result;
use crate::types::models::{TaskRecord, TaskStatus};
use std::path::Path;

pub const TASK_LOG_FILE: &str = "local-model-tasks.log";

/// Parses `timestamp|model|taskType|status|tokens` lines.
///
/// Lines with fewer than five fields are skipped and unreadable token counts
/// become 0. Only `success` counts as a successful outcome.
pub fn parse_task_log(content: &str) -> Vec<TaskRecord> {
    content
        .lines()
        .filter_map(|line| {
            let parts = line.trim().split('|').collect::<Vec<_>>();
            if parts.len() < 5 {
                if !line.trim().is_empty() {
                    tracing::debug!(line, "skipping short task log line");
                }
                return None;
            }
            Some(TaskRecord {
                timestamp: parts[0].to_string(),
                model: parts[1].to_string(),
                task_type: parts[2].to_string(),
                status: if parts[3] == "success" {
                    TaskStatus::Success
                } else {
                    TaskStatus::Failure
                },
                tokens: parts[4].parse().unwrap_or(0),
            })
        })
        .collect()
}

/// An absent log means no tasks were recorded.
pub fn load_model_task_log(path: &Path) -> Result<Vec<TaskRecord>> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no model task log");
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path)?;
    Ok(parse_task_log(&content))
}
