use crate::types::config::ComparisonPolicy;
use crate::types::models::{
    ratio, ModelComparison, ModelSummary, ModelTaskStat, TaskRecord, TaskStatus, TaskTypeSummary,
};
use std::collections::BTreeMap;

/// Groups log lines into per-model, per-task-type counters.
pub fn aggregate_task_log(records: &[TaskRecord]) -> Vec<ModelTaskStat> {
    let mut grouped = BTreeMap::<(String, String), ModelTaskStat>::new();
    for record in records {
        let stat = grouped
            .entry((record.model.clone(), record.task_type.clone()))
            .or_insert_with(|| ModelTaskStat {
                model: record.model.clone(),
                task_type: record.task_type.clone(),
                attempted: 0,
                succeeded: 0,
                tokens_used: 0,
            });
        stat.attempted += 1;
        stat.tokens_used += record.tokens;
        if record.status == TaskStatus::Success {
            stat.succeeded += 1;
        }
    }
    grouped.into_values().collect()
}

fn summarize(stats: &[ModelTaskStat]) -> BTreeMap<String, ModelSummary> {
    let mut models = BTreeMap::<String, ModelSummary>::new();
    for stat in stats {
        let summary = models
            .entry(stat.model.clone())
            .or_insert_with(|| ModelSummary {
                model: stat.model.clone(),
                tasks_attempted: 0,
                tasks_succeeded: 0,
                first_pass_rate: 0.0,
                avg_tokens_used: 0.0,
                total_tokens_used: 0,
                task_types: BTreeMap::new(),
            });
        summary.tasks_attempted += stat.attempted;
        summary.tasks_succeeded += stat.succeeded;
        summary.total_tokens_used += stat.tokens_used;

        let by_type = summary
            .task_types
            .entry(stat.task_type.clone())
            .or_insert(TaskTypeSummary {
                attempted: 0,
                succeeded: 0,
                first_pass_rate: 0.0,
            });
        by_type.attempted += stat.attempted;
        by_type.succeeded += stat.succeeded;
        by_type.first_pass_rate = ratio(by_type.succeeded, by_type.attempted);
    }

    for summary in models.values_mut() {
        summary.first_pass_rate = ratio(summary.tasks_succeeded, summary.tasks_attempted);
        summary.avg_tokens_used = if summary.tasks_attempted == 0 {
            0.0
        } else {
            summary.total_tokens_used as f64 / summary.tasks_attempted as f64
        };
    }
    models
}

/// Picks the best model per task type, the most token-efficient model and
/// the highest-quality model.
///
/// Models are visited in name order and only a strictly better value
/// replaces the current pick, so ties go to the lexicographically smallest
/// model name. Rates and averages must be positive to be picked.
pub fn compare(stats: &[ModelTaskStat], policy: ComparisonPolicy) -> ModelComparison {
    let models = summarize(stats);

    let mut best_per_type = BTreeMap::<String, (String, f64)>::new();
    for summary in models.values() {
        for (task_type, by_type) in &summary.task_types {
            if by_type.attempted == 0 || by_type.first_pass_rate <= 0.0 {
                continue;
            }
            let improves = best_per_type
                .get(task_type)
                .map_or(true, |(_, best)| by_type.first_pass_rate > *best);
            if improves {
                best_per_type.insert(
                    task_type.clone(),
                    (summary.model.clone(), by_type.first_pass_rate),
                );
            }
        }
    }

    let most_token_efficient = models
        .values()
        .filter(|summary| summary.tasks_attempted > 0 && summary.avg_tokens_used > 0.0)
        .fold(None::<&ModelSummary>, |best, summary| match best {
            Some(best) if best.avg_tokens_used <= summary.avg_tokens_used => Some(best),
            _ => Some(summary),
        })
        .map(|summary| summary.model.clone());

    let highest_quality = models
        .values()
        .filter(|summary| {
            summary.tasks_attempted > policy.min_quality_attempts && summary.first_pass_rate > 0.0
        })
        .fold(None::<&ModelSummary>, |best, summary| match best {
            Some(best) if best.first_pass_rate >= summary.first_pass_rate => Some(best),
            _ => Some(summary),
        })
        .map(|summary| summary.model.clone());

    ModelComparison {
        best_per_task_type: best_per_type
            .into_iter()
            .map(|(task_type, (model, _))| (task_type, model))
            .collect(),
        most_token_efficient: most_token_efficient.into(),
        highest_quality: highest_quality.into(),
        models: models.into_values().collect(),
    }
}

pub fn compare_models(records: &[TaskRecord], policy: ComparisonPolicy) -> ModelComparison {
    let comparison = compare(&aggregate_task_log(records), policy);
    tracing::info!(
        records = records.len(),
        models = comparison.models.len(),
        highest_quality = comparison.highest_quality.as_str(),
        "models compared"
    );
    comparison
}
