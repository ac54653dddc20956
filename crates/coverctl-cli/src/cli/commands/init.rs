use super::exit_codes;
use crate::cli::args::InitArgs;
use anyhow::Result;

pub fn cmd_init(args: InitArgs) -> Result<i32> {
    if args.config.exists() && !args.force {
        eprintln!(
            "{} already exists (use --force to overwrite)",
            args.config.display()
        );
        return Ok(exit_codes::CONFIG_ERROR);
    }
    coverctl_core::config::write_sample(&args.config)?;
    eprintln!("wrote {}", args.config.display());
    Ok(exit_codes::OK)
}
