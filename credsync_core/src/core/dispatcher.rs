use log::{error, info};

use crate::api::errors::{ConnectionUpdateError, MigrationError};
use crate::api::payload;
use crate::api::session::{Session, SessionClient};
use crate::api::transport::Transport;
use crate::storage::import::{ConnectionUpdate, SitePlan, UpdatePlan};
use crate::utils::redact::redact_password;

/// What happened to one connection update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated {
        site_content_url: String,
        datasource_id: String,
        datasource_name: String,
        connection_id: String,
        username: String,
        /// Already redacted.
        password: String,
    },
    Failed(ConnectionUpdateError),
}

impl UpdateOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UpdateOutcome::Updated { .. })
    }

    pub fn connection_id(&self) -> &str {
        match self {
            UpdateOutcome::Updated { connection_id, .. } => connection_id,
            UpdateOutcome::Failed(e) => &e.connection_id,
        }
    }
}

/// Every attempted update, in the order it was attempted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub outcomes: Vec<UpdateOutcome>,
}

impl RunReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ConnectionUpdateError> {
        self.outcomes.iter().filter_map(|o| match o {
            UpdateOutcome::Failed(e) => Some(e),
            UpdateOutcome::Updated { .. } => None,
        })
    }

    pub fn log_summary(&self) {
        info!("Finished: {} updated, {} failed", self.succeeded(), self.failed());
    }
}

/// Pushes an `UpdatePlan` to the server, one session per site.
///
/// A rejected update is recorded and the run moves on; nothing is rolled back.
pub struct UpdateDispatcher<'a, T: Transport> {
    client: &'a SessionClient<T>,
}

impl<'a, T: Transport> UpdateDispatcher<'a, T> {
    pub fn new(client: &'a SessionClient<T>) -> Self {
        Self { client }
    }

    /// Fails only if a site sign-in is rejected.
    ///
    /// On failure the updates already pushed to earlier sites are summarized
    /// in the log before the error is returned; use `dispatch_into` to keep
    /// them.
    pub async fn dispatch(&self, plan: &UpdatePlan) -> Result<RunReport, MigrationError> {
        let mut report = RunReport::default();
        match self.dispatch_into(plan, &mut report).await {
            Ok(()) => Ok(report),
            Err(e) => {
                report.log_summary();
                Err(e)
            }
        }
    }

    /// Like `dispatch`, but appends to `report`, which still holds every
    /// attempted update when a later site sign-in fails.
    pub async fn dispatch_into(
        &self,
        plan: &UpdatePlan,
        report: &mut RunReport,
    ) -> Result<(), MigrationError> {
        for (site_content_url, site) in &plan.sites {
            info!("Updating connections for site {}", site.site_name);
            info!("-------------------------------------------------");
            let session = self.client.sign_in_admin(Some(site_content_url)).await?;
            self.dispatch_site(&session, site_content_url, site, report)
                .await;
            self.client.sign_out(session).await;
        }
        Ok(())
    }

    async fn dispatch_site(
        &self,
        session: &Session,
        site_content_url: &str,
        site: &SitePlan,
        report: &mut RunReport,
    ) {
        for (datasource_id, datasource) in &site.datasources {
            for update in &datasource.connections {
                let outcome = match self
                    .update_connection(session, site, datasource_id, update)
                    .await
                {
                    Ok(()) => {
                        let password = redact_password(&update.password);
                        info!(
                            "Updated data source {}. Username: {} | Password: {}",
                            datasource.datasource_name, update.username, password
                        );
                        UpdateOutcome::Updated {
                            site_content_url: site_content_url.to_string(),
                            datasource_id: datasource_id.clone(),
                            datasource_name: datasource.datasource_name.clone(),
                            connection_id: update.connection_id.clone(),
                            username: update.username.clone(),
                            password,
                        }
                    }
                    Err(response) => {
                        let failure = ConnectionUpdateError {
                            site_name: site.site_name.clone(),
                            datasource_name: datasource.datasource_name.clone(),
                            connection_id: update.connection_id.clone(),
                            response,
                        };
                        error!("{}", failure);
                        UpdateOutcome::Failed(failure)
                    }
                };
                report.outcomes.push(outcome);
            }
        }
    }

    /// `Err` carries the raw response body, or the transport error text.
    async fn update_connection(
        &self,
        session: &Session,
        site: &SitePlan,
        datasource_id: &str,
        update: &ConnectionUpdate,
    ) -> Result<(), String> {
        let path = format!(
            "/sites/{}/datasources/{}/connections/{}",
            site.site_id, datasource_id, update.connection_id
        );
        let body = payload::connection_update_body(&update.username, &update.password);
        match self.client.put(session, &path, body).await {
            Ok(response) if payload::has_connection(&response.body) => Ok(()),
            Ok(response) => Err(response.body.to_string()),
            Err(e) => Err(e.to_string()),
        }
    }
}
