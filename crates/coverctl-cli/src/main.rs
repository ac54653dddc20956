use clap::Parser;
use tokio_util::sync::CancellationToken;

mod cli;
mod report;

use cli::args::Cli;
use cli::commands::{self, exit_codes};

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });
    }

    // Every operation is blocking file/subprocess work; the runtime only
    // exists for the signal listener above.
    let code = match tokio::task::spawn_blocking(move || commands::run(cli, cancel)).await {
        Ok(Ok(code)) => code,
        Ok(Err(e)) => {
            eprintln!("error: {e:#}");
            exit_codes::code_for(&e)
        }
        Err(e) => {
            eprintln!("fatal: {e}");
            exit_codes::CONFIG_ERROR
        }
    };
    std::process::exit(code);
}
