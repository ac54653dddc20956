use super::exit_codes;
use crate::cli::args::TrendArgs;
use crate::report;
use anyhow::Result;
use tokio_util::sync::CancellationToken;

pub fn cmd_trend(args: TrendArgs, cancel: CancellationToken) -> Result<i32> {
    let ctl = super::build_orchestrator(&args.config, &args.root, Some(&args.history), cancel)?;
    let trend = ctl.trend(args.last)?;
    report::render_trend(&trend, args.format)?;
    Ok(exit_codes::OK)
}
