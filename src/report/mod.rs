pub mod json;
pub mod md;

use crate::analyze::usage::UsageAnalysis;
use crate::error::MaturityError;
use crate::types::models::ModelComparison;
use crate::types::report::MaturityReport;
use crate::types::usage::UsageState;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Md,
}

pub fn render_maturity(
    report: &MaturityReport,
    format: OutputFormat,
) -> Result<String, MaturityError> {
    match format {
        OutputFormat::Json => json::to_json(report).map_err(MaturityError::Json),
        OutputFormat::Md => Ok(md::maturity_markdown(report)),
    }
}

pub fn render_usage(
    analysis: &UsageAnalysis,
    state: &UsageState,
    format: OutputFormat,
) -> Result<String, MaturityError> {
    match format {
        OutputFormat::Json => json::to_json(analysis).map_err(MaturityError::Json),
        OutputFormat::Md => Ok(md::usage_markdown(analysis, state)),
    }
}

pub fn render_models(
    comparison: &ModelComparison,
    format: OutputFormat,
) -> Result<String, MaturityError> {
    match format {
        OutputFormat::Json => json::to_json(comparison).map_err(MaturityError::Json),
        OutputFormat::Md => Ok(md::models_markdown(comparison)),
    }
}
