use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "maturity",
    version,
    about = "Workflow maturity scoring and usage recommendations for AI agent workflows"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score the repository across all maturity dimensions
    Score(ScoreCommand),
    /// Report usage insights and recommendations
    Usage(UsageCommand),
    /// Compare models from the task log
    Models(ModelsCommand),
    /// Record one invocation outcome for an entity
    Record(RecordCommand),
    /// Validate layered configuration
    Check(CheckCommand),
}

#[derive(Args)]
pub struct ScoreCommand {
    pub path: PathBuf,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
    /// JSON file of pre-extracted values keyed by dimension name
    #[arg(long)]
    pub values: Option<PathBuf>,
    /// Do not read or write the report history
    #[arg(long)]
    pub no_history: bool,
}

#[derive(Args)]
pub struct UsageCommand {
    pub path: PathBuf,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct ModelsCommand {
    pub path: PathBuf,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct RecordCommand {
    pub path: PathBuf,
    pub entity: String,
    /// Record the invocation as failed
    #[arg(long)]
    pub failure: bool,
}

#[derive(Args)]
pub struct CheckCommand {
    pub path: PathBuf,
}

#[derive(Clone, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}
