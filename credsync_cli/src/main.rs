mod ui;

use clap::Parser;
use crate::ui::cli;
use credsync_core::utils::logging::init_logging;

#[tokio::main]
async fn main() {
    init_logging();
    let args = cli::Args::parse();
    match cli::run_cli(args).await {
        Ok(cli::RunStatus::Clean) => {}
        Ok(cli::RunStatus::PartialFailure) => std::process::exit(2),
        Err(e) => {
            eprintln!("CLI error: {e}");
            std::process::exit(1);
        }
    }
}
