use super::exit_codes;
use crate::cli::args::CheckArgs;
use crate::report;
use anyhow::Result;
use coverctl_core::orchestrate::CheckOptions;
use tokio_util::sync::CancellationToken;

pub fn cmd_check(args: CheckArgs, cancel: CancellationToken) -> Result<i32> {
    let ctl = super::build_orchestrator(&args.config, &args.root, Some(&args.history), cancel)?;

    let outcome = ctl.check(&CheckOptions {
        profiles: args.profiles.clone(),
        diff_ref: args.diff.clone(),
        incremental: args.incremental,
        fail_under: args.fail_under,
        ratchet: args.ratchet,
        record: args.record,
    })?;

    report::render_check(&outcome, args.format)?;

    if outcome.passed() {
        Ok(exit_codes::OK)
    } else {
        Ok(exit_codes::POLICY_FAILED)
    }
}
