use super::exit_codes;
use crate::cli::args::SuggestArgs;
use crate::report;
use anyhow::Result;
use tokio_util::sync::CancellationToken;

pub fn cmd_suggest(args: SuggestArgs, cancel: CancellationToken) -> Result<i32> {
    match run(args, cancel) {
        Ok(code) => Ok(code),
        Err(e) => {
            eprintln!("suggest failed: {e:#}");
            Ok(exit_codes::ADVICE_FAILED)
        }
    }
}

fn run(args: SuggestArgs, cancel: CancellationToken) -> Result<i32> {
    let strategy: coverctl_core::analytics::suggest::Strategy = args.strategy.parse()?;
    let ctl = super::build_orchestrator(&args.config, &args.root, None, cancel)?;

    let suggestions = ctl.suggest(&args.profiles, strategy)?;
    report::render_suggestions(&suggestions, args.format)?;

    if args.apply {
        let updated = ctl.suggest_apply(&suggestions);
        coverctl_core::config::save(&args.config, &updated)?;
        eprintln!("updated {}", args.config.display());
    }
    Ok(exit_codes::OK)
}
