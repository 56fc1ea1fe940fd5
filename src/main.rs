mod analyze;
mod cli;
mod config;
mod error;
mod report;
mod scan;
mod store;
mod types;

use crate::error::MaturityError;
use crate::store::UsageStore;
use clap::Parser;
use std::path::Path;
use tracing_subscriber::EnvFilter;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const WARNINGS: i32 = 1;
    pub const INVALID_CONFIG: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn ensure_exists(path: &Path) -> Result<(), MaturityError> {
    if path.exists() {
        Ok(())
    } else {
        Err(MaturityError::PathNotFound(path.display().to_string()))
    }
}

fn output_format(format: &cli::ReportFormat) -> report::OutputFormat {
    match format {
        cli::ReportFormat::Json => report::OutputFormat::Json,
        cli::ReportFormat::Md => report::OutputFormat::Md,
    }
}

fn run(cli: cli::Cli) -> Result<i32, MaturityError> {
    match cli.command {
        cli::Commands::Score(cmd) => {
            ensure_exists(&cmd.path)?;
            let (cfg, found) = config::load_validated(&cmd.path)?;
            match (&cfg.project, found) {
                (Some(project), _) => tracing::info!(project = %project.name, "scoring project"),
                (None, false) => {
                    tracing::info!(path = %cmd.path.display(), "no maturity.toml found, using defaults")
                }
                (None, true) => {}
            }
            let specs = cfg.dimension_specs()?;
            let paths = cfg.paths();
            let metrics_dir = cmd.path.join(&paths.metrics_dir);

            let overrides = cmd
                .values
                .as_deref()
                .map(scan::FixedMetricSource::load)
                .transpose()?;
            let repo = scan::RepoMetricSource::new(&cmd.path, paths);
            let source = scan::LayeredSource {
                overrides: overrides.as_ref(),
                fallback: &repo,
            };

            let history = store::ReportHistory::in_dir(&metrics_dir);
            let previous = if cmd.no_history {
                None
            } else {
                history.load_previous()
            };
            let maturity = analyze::compute_maturity_report(&specs, &source, previous.as_ref());
            if !cmd.no_history {
                history.save(&maturity)?;
            }

            let rendered = report::render_maturity(&maturity, output_format(&cmd.format))?;
            println!("{rendered}");

            let unmeasured = maturity
                .unmeasured()
                .map(|dimension| dimension.name.as_str())
                .collect::<Vec<_>>();
            if unmeasured.is_empty() {
                Ok(exit_code::SUCCESS)
            } else {
                tracing::warn!(dimensions = ?unmeasured, "some dimensions were not measured");
                Ok(exit_code::WARNINGS)
            }
        }
        cli::Commands::Usage(cmd) => {
            ensure_exists(&cmd.path)?;
            let (cfg, _) = config::load_validated(&cmd.path)?;
            let metrics_dir = cmd.path.join(cfg.paths().metrics_dir);
            let state = store::JsonUsageStore::in_dir(&metrics_dir).load()?;

            let analysis = analyze::compute_recommendations(&state.entities, &cfg.usage_policy());
            let rendered = report::render_usage(&analysis, &state, output_format(&cmd.format))?;
            println!("{rendered}");
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Models(cmd) => {
            ensure_exists(&cmd.path)?;
            let (cfg, _) = config::load_validated(&cmd.path)?;
            let log_path = cmd
                .path
                .join(cfg.paths().metrics_dir)
                .join(scan::task_log::TASK_LOG_FILE);
            let records = scan::task_log::load_model_task_log(&log_path)?;

            let comparison = analyze::compare_models(&records, cfg.comparison_policy());
            let rendered = report::render_models(&comparison, output_format(&cmd.format))?;
            println!("{rendered}");
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Record(cmd) => {
            ensure_exists(&cmd.path)?;
            let (cfg, _) = config::load_validated(&cmd.path)?;
            let metrics_dir = cmd.path.join(cfg.paths().metrics_dir);
            let usage_store = store::JsonUsageStore::in_dir(&metrics_dir);

            let mut tracker = analyze::IncrementalRateTracker::new(usage_store.load()?);
            let updated = tracker.record(&cmd.entity, !cmd.failure);
            usage_store.save(tracker.state())?;

            if !cli.quiet {
                println!(
                    "recorded {}: {} invocations, success rate {:.2}",
                    updated.id, updated.invocations, updated.success_rate
                );
            }
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Check(cmd) => {
            ensure_exists(&cmd.path)?;
            let (cfg, found) = config::load_validated(&cmd.path)?;
            let specs = cfg.dimension_specs()?;

            if !cli.quiet {
                if found {
                    println!("config: ok");
                    if let Some(project) = &cfg.project {
                        println!("project: {}", project.name);
                    }
                } else {
                    println!("config: none found, using defaults");
                }
                for spec in &specs {
                    println!(
                        "- {} (weight {:.2}, {} thresholds)",
                        spec.name,
                        spec.weight,
                        spec.thresholds.as_slice().len()
                    );
                }
            }
            Ok(exit_code::SUCCESS)
        }
    }
}

fn main() {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            let code = if e.is_malformed_input() {
                exit_code::INVALID_CONFIG
            } else {
                exit_code::RUNTIME_FAILURE
            };
            std::process::exit(code);
        }
    }
}
