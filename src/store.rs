use crate::error::{MaturityError, Result};
use crate::scan::counters::read_json_if_exists;
use crate::types::report::MaturityReport;
use crate::types::usage::UsageState;
use std::fs;
use std::path::{Path, PathBuf};

pub const USAGE_FILE: &str = "command-usage.json";
pub const HISTORY_FILE: &str = "process-maturity.json";

/// Load/save pair for the usage snapshot.
pub trait UsageStore {
    fn load(&self) -> Result<UsageState>;
    fn save(&self, state: &UsageState) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct JsonUsageStore {
    path: PathBuf,
}

impl JsonUsageStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(metrics_dir: &Path) -> Self {
        Self::new(metrics_dir.join(USAGE_FILE))
    }
}

impl UsageStore for JsonUsageStore {
    fn load(&self) -> Result<UsageState> {
        let state = read_json_if_exists::<UsageState>(&self.path)?.unwrap_or_else(|| {
            tracing::debug!(path = %self.path.display(), "no usage state yet");
            UsageState::default()
        });
        Ok(state.with_ids())
    }

    fn save(&self, state: &UsageState) -> Result<()> {
        write_json(&self.path, state)
    }
}

/// Last persisted maturity report, used for the trend.
#[derive(Debug, Clone)]
pub struct ReportHistory {
    path: PathBuf,
}

impl ReportHistory {
    pub fn in_dir(metrics_dir: &Path) -> Self {
        Self {
            path: metrics_dir.join(HISTORY_FILE),
        }
    }

    /// An unreadable history is treated as absent so the run still reports.
    pub fn load_previous(&self) -> Option<MaturityReport> {
        match read_json_if_exists::<MaturityReport>(&self.path) {
            Ok(previous) => previous,
            Err(error) => {
                tracing::warn!(path = %self.path.display(), %error, "ignoring unreadable history");
                None
            }
        }
    }

    pub fn save(&self, report: &MaturityReport) -> Result<()> {
        write_json(&self.path, report)
    }
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(MaturityError::Io)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(MaturityError::Io)?;
    Ok(())
}
