use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "coverctl",
    version,
    about = "Domain-driven test coverage enforcement"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Evaluate coverage against the policy and gate on it
    Check(CheckArgs),
    /// Coverage movement versus the last recorded run
    Delta(DeltaArgs),
    /// Trend line over recorded history
    Trend(TrendArgs),
    /// Shortfall and lines-needed per failing domain
    Debt(DebtArgs),
    /// Threshold suggestions from current coverage
    Suggest(SuggestArgs),
    /// Compare two profiles under the same policy
    Compare(CompareArgs),
    /// Inspect or clear the recorded history
    History(HistoryArgs),
    /// Write a starter .coverctl.yaml
    Init(InitArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    /// One stable line for machine consumption
    Brief,
    Html,
}

#[derive(clap::Args, Debug, Clone)]
pub struct CheckArgs {
    #[arg(long, default_value = ".coverctl.yaml")]
    pub config: PathBuf,

    /// Project root the policy patterns resolve against
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Coverage profile to evaluate; repeat to merge several runs
    #[arg(long = "profile")]
    pub profiles: Vec<PathBuf>,

    /// Narrow the report to files changed versus a ref
    #[arg(long, num_args = 0..=1, default_missing_value = "origin/main")]
    pub diff: Option<String>,

    /// Narrow to packages owning files changed since HEAD~1
    #[arg(long)]
    pub incremental: bool,

    /// Overall floor in addition to per-domain thresholds
    #[arg(long)]
    pub fail_under: Option<f64>,

    /// Fail if overall coverage drops below the last recorded run
    #[arg(long)]
    pub ratchet: bool,

    /// Append this run to history
    #[arg(long)]
    pub record: bool,

    #[arg(long, default_value = ".coverctl.history.json")]
    pub history: PathBuf,

    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug, Clone)]
pub struct DeltaArgs {
    #[arg(long, default_value = ".coverctl.yaml")]
    pub config: PathBuf,

    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    #[arg(long = "profile", required = true)]
    pub profiles: Vec<PathBuf>,

    #[arg(long, default_value = ".coverctl.history.json")]
    pub history: PathBuf,

    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug, Clone)]
pub struct TrendArgs {
    #[arg(long, default_value = ".coverctl.yaml")]
    pub config: PathBuf,

    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    #[arg(long, default_value = ".coverctl.history.json")]
    pub history: PathBuf,

    /// Only consider the last N entries
    #[arg(long)]
    pub last: Option<usize>,

    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug, Clone)]
pub struct DebtArgs {
    #[arg(long, default_value = ".coverctl.yaml")]
    pub config: PathBuf,

    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    #[arg(long = "profile", required = true)]
    pub profiles: Vec<PathBuf>,

    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug, Clone)]
pub struct SuggestArgs {
    #[arg(long, default_value = ".coverctl.yaml")]
    pub config: PathBuf,

    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    #[arg(long = "profile", required = true)]
    pub profiles: Vec<PathBuf>,

    /// current | aggressive | conservative
    #[arg(long, default_value = "current")]
    pub strategy: String,

    /// Rewrite the config with the suggested thresholds
    #[arg(long)]
    pub apply: bool,

    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug, Clone)]
pub struct CompareArgs {
    #[arg(long, default_value = ".coverctl.yaml")]
    pub config: PathBuf,

    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    #[arg(long)]
    pub base: PathBuf,

    #[arg(long)]
    pub head: PathBuf,

    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug, Clone)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub cmd: HistorySub,

    #[arg(long, default_value = ".coverctl.history.json")]
    pub history: PathBuf,
}

#[derive(Subcommand, Debug, Clone)]
pub enum HistorySub {
    /// Print recorded entries
    Show {
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Drop all recorded entries
    Clear,
}

#[derive(clap::Args, Debug, Clone)]
pub struct InitArgs {
    #[arg(long, default_value = ".coverctl.yaml")]
    pub config: PathBuf,

    /// Overwrite an existing config
    #[arg(long)]
    pub force: bool,
}
