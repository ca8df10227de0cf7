use log::{debug, info};

use crate::api::errors::MigrationError;
use crate::api::payload;
use crate::api::session::{Session, SessionClient};
use crate::api::transport::{ApiResponse, Transport};
use crate::storage::record::{Connection, ConnectionRecord, DataSource, Site};

/// Enumerates every site, data source and connection the administrator can see.
pub struct DirectoryWalker<'a, T: Transport> {
    client: &'a SessionClient<T>,
}

impl<'a, T: Transport> DirectoryWalker<'a, T> {
    pub fn new(client: &'a SessionClient<T>) -> Self {
        Self { client }
    }

    /// All sites visible to `session`, in server order.
    pub async fn list_sites(&self, session: &Session) -> Result<Vec<Site>, MigrationError> {
        let response = self.client.get(session, "/sites").await?;
        let body = expect_success(response, "sites")?;
        payload::collection(&body, "sites", "site")
    }

    /// Data sources of `site`; `session` must be scoped to it.
    pub async fn list_datasources(
        &self,
        session: &Session,
        site: &Site,
    ) -> Result<Vec<DataSource>, MigrationError> {
        session.ensure_site(&site.content_url)?;
        let response = self
            .client
            .get(session, &format!("/sites/{}/datasources", site.id))
            .await?;
        let body = expect_success(response, "datasources")?;
        payload::collection(&body, "datasources", "datasource")
    }

    /// Connections of one data source of `site`.
    pub async fn list_connections(
        &self,
        session: &Session,
        site: &Site,
        datasource: &DataSource,
    ) -> Result<Vec<Connection>, MigrationError> {
        session.ensure_site(&site.content_url)?;
        let response = self
            .client
            .get(
                session,
                &format!("/sites/{}/datasources/{}/connections", site.id, datasource.id),
            )
            .await?;
        let body = expect_success(response, "connections")?;
        payload::collection(&body, "connections", "connection")
    }

    /// Walks the whole server and returns one record per connection.
    ///
    /// Signs in once to the default site to list sites, then once per site.
    /// Every session is signed out before returning, on error paths too.
    pub async fn collect_records(&self) -> Result<Vec<ConnectionRecord>, MigrationError> {
        let root = self.client.sign_in_admin(None).await?;
        info!(
            "Getting all sites on Tableau Server [{}]...",
            self.client.config().server_url
        );
        let sites = self.list_sites(&root).await;
        self.client.sign_out(root).await;
        let sites = sites?;

        let mut records = Vec::new();
        for site in &sites {
            info!("Getting datasources for {} site...", site.name);
            let session = self.client.sign_in_admin(Some(&site.content_url)).await?;
            let result = self.collect_site(&session, site, &mut records).await;
            self.client.sign_out(session).await;
            result?;
        }
        Ok(records)
    }

    async fn collect_site(
        &self,
        session: &Session,
        site: &Site,
        records: &mut Vec<ConnectionRecord>,
    ) -> Result<(), MigrationError> {
        let datasources = self.list_datasources(session, site).await?;
        debug!("Site '{}' has {} datasources", site.name, datasources.len());
        for datasource in &datasources {
            let connections = self.list_connections(session, site, datasource).await?;
            records.extend(
                connections
                    .iter()
                    .map(|connection| ConnectionRecord::new(site, datasource, connection)),
            );
        }
        Ok(())
    }
}

fn expect_success(response: ApiResponse, what: &str) -> Result<serde_json::Value, MigrationError> {
    if response.is_success() {
        Ok(response.body)
    } else {
        Err(MigrationError::Api(format!(
            "Listing {} failed ({}): {}",
            what, response.status, response.body
        )))
    }
}
