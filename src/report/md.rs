use crate::analyze::usage::UsageAnalysis;
use crate::types::models::ModelComparison;
use crate::types::report::{MaturityReport, Recommendation, Trend};
use crate::types::usage::UsageState;

pub fn maturity_markdown(report: &MaturityReport) -> String {
    let trend = match report.trend {
        Trend::Improving => "improving",
        Trend::Stable => "stable",
        Trend::Declining => "declining",
    };

    let mut output = String::new();
    output.push_str("# Process Maturity Report\n\n");
    output.push_str(&format!(
        "Overall score: {:.1} / 10 ({:?}, {trend})\n\n",
        report.overall_score, report.level
    ));
    output.push_str(&format!("{}\n\n", report.level.description()));

    output.push_str("## Dimensions\n\n");
    output.push_str("| Dimension | Score | Weight | Detail |\n");
    output.push_str("|---|---|---|---|\n");
    for dimension in &report.dimensions {
        let detail = if dimension.measured {
            dimension.detail.clone()
        } else {
            format!("not measured: {}", dimension.detail)
        };
        output.push_str(&format!(
            "| {} | {}/10 | {:.0}% | {} |\n",
            dimension.name,
            dimension.score,
            dimension.weight * 100.0,
            detail
        ));
    }
    output.push_str(&format!("\nComputed at: {}\n", report.computed_at.to_rfc3339()));
    output
}

pub fn usage_markdown(analysis: &UsageAnalysis, state: &UsageState) -> String {
    let mut output = String::new();
    output.push_str("# Usage Analysis\n\n");

    output.push_str("## Most Used\n\n");
    if analysis.insights.most_used.is_empty() {
        output.push_str("- none\n\n");
    } else {
        for id in &analysis.insights.most_used {
            let invocations = state
                .entities
                .get(id)
                .map_or(0, |usage| usage.invocations);
            output.push_str(&format!("- {id}: {invocations} invocations\n"));
        }
        output.push('\n');
    }

    output.push_str("## Never Used\n\n");
    if analysis.insights.least_used.is_empty() {
        output.push_str("- all entries have been used at least once\n\n");
    } else {
        for id in &analysis.insights.least_used {
            output.push_str(&format!("- {id}\n"));
        }
        output.push('\n');
    }

    output.push_str("## Redundancy\n\n");
    if analysis.insights.redundancy.is_empty() {
        output.push_str("- no obvious redundancy detected\n\n");
    } else {
        for cluster in &analysis.insights.redundancy {
            output.push_str(&format!(
                "- {}: {} ({})\n",
                cluster.members.join(", "),
                cluster.reason,
                cluster.suggestion
            ));
        }
        output.push('\n');
    }

    push_recommendations(&mut output, &analysis.recommendations);
    output
}

pub fn models_markdown(comparison: &ModelComparison) -> String {
    let mut output = String::new();
    output.push_str("# Model Comparison\n\n");

    if comparison.models.is_empty() {
        output.push_str("No model tasks recorded.\n\n");
    }
    for summary in &comparison.models {
        output.push_str(&format!("## {}\n\n", summary.model));
        output.push_str(&format!(
            "- tasks attempted: {}\n- first-pass rate: {:.1}%\n- avg tokens: {:.0}\n",
            summary.tasks_attempted,
            summary.first_pass_rate * 100.0,
            summary.avg_tokens_used
        ));
        for (task_type, stats) in &summary.task_types {
            output.push_str(&format!(
                "- {task_type}: {:.0}% ({}/{})\n",
                stats.first_pass_rate * 100.0,
                stats.succeeded,
                stats.attempted
            ));
        }
        output.push('\n');
    }

    output.push_str("## Comparison\n\n");
    for (task_type, model) in &comparison.best_per_task_type {
        output.push_str(&format!("- best for {task_type}: {model}\n"));
    }
    output.push_str(&format!(
        "- most token efficient: {}\n- highest quality: {}\n",
        comparison.most_token_efficient.as_str(),
        comparison.highest_quality.as_str()
    ));
    output
}

fn push_recommendations(output: &mut String, recommendations: &[Recommendation]) {
    output.push_str("## Recommendations\n\n");
    if recommendations.is_empty() {
        output.push_str("- none\n");
        return;
    }
    for recommendation in recommendations {
        output.push_str(&format!(
            "- [{:?}] {:?}: {} ({})\n",
            recommendation.priority,
            recommendation.category,
            recommendation.issue,
            recommendation.suggestion
        ));
    }
}
