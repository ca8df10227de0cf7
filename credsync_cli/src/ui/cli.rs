use std::path::PathBuf;

use clap::{Parser, Subcommand};
use credsync_core::config::{ServerConfig, ENV_API_VERSION, ENV_SERVER_URL, ENV_USERNAME};
use credsync_core::storage::DEFAULT_EXPORT_PATH;
use credsync_core::{export_connections, import_and_update, MigrationError, SessionClient};
use log::{info, warn};

/// Command-line arguments.
///
/// Server, API version and user fall back to `TS_ADDRESS`, `TS_API_VERSION`
/// and `TS_USERNAME`; the password is only ever read from `TS_PASSWORD`.
#[derive(Parser, Debug)]
#[command(name = "credsync", version, subcommand_required = true)]
pub struct Args {
    /// Tableau Server base URL, e.g. https://tableau.acme.com
    #[arg(long, global = true)]
    pub server: Option<String>,
    /// REST API version, e.g. 3.19
    #[arg(long, global = true)]
    pub api_version: Option<String>,
    /// Server administrator user name
    #[arg(long, global = true)]
    pub username: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List every connection on every site into a CSV file
    Export {
        /// Destination file (overwritten)
        #[arg(long, short, default_value = DEFAULT_EXPORT_PATH)]
        output: PathBuf,
    },
    /// Push the updated_username/updated_password columns of an edited export
    Import {
        /// The edited CSV file
        path: PathBuf,
    },
}

/// How a run that did not hit a fatal error ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Clean,
    /// Import finished, but the server refused at least one update.
    PartialFailure,
}

pub async fn run_cli(args: Args) -> Result<RunStatus, MigrationError> {
    let config = resolve_config(&args)?;
    let client = SessionClient::connect(config);

    match args.command {
        Command::Export { output } => {
            let rows = export_connections(&client, &output).await?;
            info!("Export finished: {} connections", rows);
            Ok(RunStatus::Clean)
        }
        Command::Import { path } => {
            let report = import_and_update(&client, &path).await?;
            if report.failed() > 0 {
                warn!(
                    "{} of {} connection updates failed; see the errors above",
                    report.failed(),
                    report.total()
                );
                Ok(RunStatus::PartialFailure)
            } else {
                Ok(RunStatus::Clean)
            }
        }
    }
}

/// Flags win over the environment.
fn resolve_config(args: &Args) -> Result<ServerConfig, MigrationError> {
    ServerConfig::from_lookup(|key| {
        let flag = match key {
            ENV_SERVER_URL => args.server.clone(),
            ENV_API_VERSION => args.api_version.clone(),
            ENV_USERNAME => args.username.clone(),
            _ => None,
        };
        flag.or_else(|| std::env::var(key).ok())
    })
}
