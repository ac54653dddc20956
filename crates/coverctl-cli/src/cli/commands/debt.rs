use super::exit_codes;
use crate::cli::args::DebtArgs;
use crate::report;
use anyhow::Result;
use tokio_util::sync::CancellationToken;

pub fn cmd_debt(args: DebtArgs, cancel: CancellationToken) -> Result<i32> {
    // Advice commands collapse their own failures to the advice exit
    // code rather than the operational one.
    match run(args, cancel) {
        Ok(code) => Ok(code),
        Err(e) => {
            eprintln!("debt analysis failed: {e:#}");
            Ok(exit_codes::ADVICE_FAILED)
        }
    }
}

fn run(args: DebtArgs, cancel: CancellationToken) -> Result<i32> {
    let ctl = super::build_orchestrator(&args.config, &args.root, None, cancel)?;
    let debt = ctl.debt(&args.profiles)?;
    report::render_debt(&debt, args.format)?;
    Ok(exit_codes::OK)
}
