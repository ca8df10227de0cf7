use std::io::Write;
use std::path::Path;

use log::info;

use super::record::ConnectionRecord;
use crate::api::errors::MigrationError;

pub const DEFAULT_EXPORT_PATH: &str = "datasources.csv";

/// Column names of the export table, in order.
pub const HEADER: [&str; 13] = [
    "site_id",
    "site_name",
    "site_content_url",
    "datasource_id",
    "datasource_name",
    "datasource_content_url",
    "connection_id",
    "connection_type",
    "connection_server_address",
    "connection_server_port",
    "connection_username",
    "updated_username",
    "updated_password",
];

/// Create or overwrite `path` with one row per record. Returns the row count.
pub fn write_export(path: &Path, records: &[ConnectionRecord]) -> Result<usize, MigrationError> {
    info!("Writing CSV...");
    let file = std::fs::File::create(path)?;
    let written = write_records(file, records)?;
    info!("Wrote {} datasources to {}", written, path.display());
    Ok(written)
}

/// Writes the header and the records to any sink.
///
/// The `updated_*` columns are always left blank, whatever the records hold.
pub fn write_records<W: Write>(sink: W, records: &[ConnectionRecord]) -> Result<usize, MigrationError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(sink);
    // Written by hand so an empty export still carries the header.
    writer.write_record(HEADER)?;
    for record in records {
        writer.serialize(ConnectionRecord {
            updated_username: String::new(),
            updated_password: String::new(),
            ..record.clone()
        })?;
    }
    writer.flush()?;
    Ok(records.len())
}
