use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::path::Path;

use log::info;
use serde::Deserialize;

use crate::api::errors::MigrationError;
use crate::utils::redact::redact_password;

/// New credentials for one connection.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionUpdate {
    pub connection_id: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for ConnectionUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionUpdate")
            .field("connection_id", &self.connection_id)
            .field("username", &self.username)
            .field("password", &redact_password(&self.password))
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSourcePlan {
    pub datasource_name: String,
    pub connections: Vec<ConnectionUpdate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitePlan {
    pub site_id: String,
    pub site_name: String,
    /// Keyed by data source id.
    pub datasources: BTreeMap<String, DataSourcePlan>,
}

/// Updates grouped by site content URL, then by data source id.
///
/// Only ever built from rows that carry both new credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdatePlan {
    pub sites: BTreeMap<String, SitePlan>,
}

impl UpdatePlan {
    /// Total number of connection updates across all sites.
    pub fn connection_count(&self) -> usize {
        self.sites
            .values()
            .flat_map(|site| site.datasources.values())
            .map(|ds| ds.connections.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.connection_count() == 0
    }

    fn insert(&mut self, row: ImportRow) {
        let site = self
            .sites
            .entry(row.site_content_url)
            .or_insert_with(|| SitePlan {
                site_id: row.site_id,
                site_name: row.site_name,
                datasources: BTreeMap::new(),
            });
        site.datasources
            .entry(row.datasource_id)
            .or_insert_with(|| DataSourcePlan {
                datasource_name: row.datasource_name,
                connections: Vec::new(),
            })
            .connections
            .push(ConnectionUpdate {
                connection_id: row.connection_id,
                username: row.updated_username,
                password: row.updated_password,
            });
    }
}

/// The columns the import needs; any other column is ignored.
#[derive(Deserialize)]
struct ImportRow {
    site_id: String,
    site_name: String,
    site_content_url: String,
    datasource_id: String,
    datasource_name: String,
    connection_id: String,
    #[serde(default)]
    updated_username: String,
    #[serde(default)]
    updated_password: String,
}

impl fmt::Debug for ImportRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportRow")
            .field("site_content_url", &self.site_content_url)
            .field("datasource_id", &self.datasource_id)
            .field("connection_id", &self.connection_id)
            .field("updated_username", &self.updated_username)
            .field("updated_password", &redact_password(&self.updated_password))
            .finish_non_exhaustive()
    }
}

impl ImportRow {
    fn validate(&self, line: usize) -> Result<(), MigrationError> {
        if self.updated_username.is_empty() {
            return Err(MigrationError::Validation(format!(
                "line {}: updated_username must be provided, even if you are not changing the value",
                line
            )));
        }
        if self.updated_password.is_empty() {
            return Err(MigrationError::Validation(format!(
                "line {}: updated_password must be provided, even if you are not changing the value",
                line
            )));
        }
        Ok(())
    }
}

/// Reads an edited export back into an `UpdatePlan`.
pub fn read_plan(path: &Path) -> Result<UpdatePlan, MigrationError> {
    info!("Collecting data from CSV [{}]...", path.display());
    let file = std::fs::File::open(path)?;
    let plan = plan_from_reader(file)?;
    info!(
        "Collected {} connection updates across {} sites",
        plan.connection_count(),
        plan.sites.len()
    );
    Ok(plan)
}

/// Parses the whole table; the first invalid row fails the lot.
pub fn plan_from_reader<R: Read>(source: R) -> Result<UpdatePlan, MigrationError> {
    let mut reader = csv::ReaderBuilder::new().from_reader(source);
    let mut plan = UpdatePlan::default();

    for (idx, result) in reader.deserialize::<ImportRow>().enumerate() {
        // +1 for the header, +1 for 1-based lines
        let line = idx + 2;
        let row = result
            .map_err(|e| MigrationError::Validation(format!("line {}: {}", line, e)))?;
        row.validate(line)?;
        plan.insert(row);
    }
    Ok(plan)
}
