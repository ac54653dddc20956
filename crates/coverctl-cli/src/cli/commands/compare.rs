use super::exit_codes;
use crate::cli::args::CompareArgs;
use crate::report;
use anyhow::Result;
use tokio_util::sync::CancellationToken;

pub fn cmd_compare(args: CompareArgs, cancel: CancellationToken) -> Result<i32> {
    let ctl = super::build_orchestrator(&args.config, &args.root, None, cancel)?;
    let cmp = ctl.compare(&args.base, &args.head)?;
    report::render_compare(&cmp, args.format)?;
    Ok(exit_codes::OK)
}
