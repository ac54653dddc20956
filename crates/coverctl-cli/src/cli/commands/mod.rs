use crate::cli::args::{Cli, Command};
use tokio_util::sync::CancellationToken;

pub mod check;
pub mod compare;
pub mod debt;
pub mod delta;
pub mod history;
pub mod init;
pub mod suggest;
pub mod trend;

pub mod exit_codes {
    pub const OK: i32 = 0;
    pub const POLICY_FAILED: i32 = 1;
    pub const CONFIG_ERROR: i32 = 2;
    pub const OPERATIONAL_ERROR: i32 = 3;
    pub const ADVICE_FAILED: i32 = 4;
    // Reserved for the interactive wizard.
    #[allow(dead_code)]
    pub const WIZARD_CANCELED: i32 = 5;

    /// Collapse an error into the exit-code taxonomy. Anything that is
    /// not a known core error counts as caller/config misuse.
    pub fn code_for(err: &anyhow::Error) -> i32 {
        match err.downcast_ref::<coverctl_core::Error>() {
            Some(coverctl_core::Error::PolicyViolation(_)) => POLICY_FAILED,
            Some(
                coverctl_core::Error::ProfileFormat(_)
                | coverctl_core::Error::Resolve(_)
                | coverctl_core::Error::HistoryCorrupt(_)
                | coverctl_core::Error::Canceled,
            ) => OPERATIONAL_ERROR,
            Some(
                coverctl_core::Error::ConfigFormat(_)
                | coverctl_core::Error::Usage(_)
                | coverctl_core::Error::Io { .. },
            ) => CONFIG_ERROR,
            None => CONFIG_ERROR,
        }
    }
}

/// Shared wiring: load the policy, stand up the orchestrator for the
/// project root, and point it at the chosen history file.
pub(crate) fn build_orchestrator(
    config: &std::path::Path,
    root: &std::path::Path,
    history: Option<&std::path::Path>,
    cancel: CancellationToken,
) -> anyhow::Result<coverctl_core::orchestrate::Coverctl> {
    use anyhow::Context;

    let policy = coverctl_core::config::load(config)
        .with_context(|| format!("failed to load {}", config.display()))?;
    let mut ctl =
        coverctl_core::orchestrate::Coverctl::new(policy, root)?.with_cancellation(cancel);
    if let Some(path) = history {
        ctl = ctl.with_history(coverctl_core::history::HistoryStore::new(path));
    }
    Ok(ctl)
}

pub fn run(cli: Cli, cancel: CancellationToken) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Check(args) => check::cmd_check(args, cancel),
        Command::Delta(args) => delta::cmd_delta(args, cancel),
        Command::Trend(args) => trend::cmd_trend(args, cancel),
        Command::Debt(args) => debt::cmd_debt(args, cancel),
        Command::Suggest(args) => suggest::cmd_suggest(args, cancel),
        Command::Compare(args) => compare::cmd_compare(args, cancel),
        Command::History(args) => history::cmd_history(args),
        Command::Init(args) => init::cmd_init(args),
    }
}
