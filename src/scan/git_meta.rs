use crate::error::{MaturityError, Result};
use chrono::{Duration, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::process::Command;

const COMMIT_MARKER: &str = "__commit__";

pub fn last_commit_unix(root: &Path, relative_path: &str) -> Option<i64> {
    let output = Command::new("git")
        .arg("-C")
        .arg(root)
        .arg("log")
        .arg("-1")
        .arg("--format=%ct")
        .arg("--")
        .arg(relative_path)
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let stdout = String::from_utf8(output.stdout).ok()?;
    stdout.trim().parse::<i64>().ok()
}

pub fn age_days(commit_unix: i64) -> i64 {
    (Utc::now().timestamp() - commit_unix).max(0) / 86_400
}

/// Names of files touched by `fix:` commits inside the lookback window.
pub fn fix_commit_log(root: &Path, lookback_days: u32) -> Result<String> {
    let since = (Utc::now() - Duration::days(i64::from(lookback_days)))
        .format("%Y-%m-%d")
        .to_string();
    let output = Command::new("git")
        .arg("-C")
        .arg(root)
        .args(["log", "--since", &since, "--grep", "fix:", "--name-only"])
        .arg(format!("--format={COMMIT_MARKER}%H"))
        .output()?;

    if !output.status.success() {
        return Err(MaturityError::MissingData(format!(
            "git log failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// How many fix commits touched each file; a file counts once per commit.
pub fn fixes_per_file(log: &str) -> BTreeMap<String, u32> {
    let mut counts = BTreeMap::new();
    let mut current = BTreeSet::new();
    let mut flush = |files: &mut BTreeSet<String>| {
        for file in std::mem::take(files) {
            *counts.entry(file).or_insert(0) += 1;
        }
    };

    for line in log.lines().map(str::trim) {
        if line.starts_with(COMMIT_MARKER) {
            flush(&mut current);
        } else if !line.is_empty() {
            current.insert(line.to_string());
        }
    }
    flush(&mut current);
    counts
}
