//! The two phases end to end: server → CSV, and CSV → server.

use std::path::Path;

use log::warn;

use super::dispatcher::{RunReport, UpdateDispatcher};
use super::walker::DirectoryWalker;
use crate::api::errors::MigrationError;
use crate::api::session::SessionClient;
use crate::api::transport::Transport;
use crate::storage::{export, import};

/// Walks the server and writes the export table. Returns the row count.
pub async fn export_connections<T: Transport>(
    client: &SessionClient<T>,
    destination: &Path,
) -> Result<usize, MigrationError> {
    let records = DirectoryWalker::new(client).collect_records().await?;
    export::write_export(destination, &records)
}

/// Reads the edited table and pushes every row.
///
/// The file is validated completely before the first request goes out.
pub async fn import_and_update<T: Transport>(
    client: &SessionClient<T>,
    source: &Path,
) -> Result<RunReport, MigrationError> {
    let plan = import::read_plan(source)?;
    if plan.is_empty() {
        warn!("{} contains no rows; nothing to update", source.display());
        return Ok(RunReport::default());
    }
    let report = UpdateDispatcher::new(client).dispatch(&plan).await?;
    report.log_summary();
    Ok(report)
}
