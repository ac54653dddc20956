use super::exit_codes;
use crate::cli::args::DeltaArgs;
use crate::report;
use anyhow::Result;
use tokio_util::sync::CancellationToken;

pub fn cmd_delta(args: DeltaArgs, cancel: CancellationToken) -> Result<i32> {
    let ctl = super::build_orchestrator(&args.config, &args.root, Some(&args.history), cancel)?;
    let delta = ctl.delta(&args.profiles)?;
    report::render_delta(&delta, args.format)?;
    Ok(exit_codes::OK)
}
