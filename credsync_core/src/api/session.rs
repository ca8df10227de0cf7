use log::{debug, info};
use serde_json::Value;

use super::errors::MigrationError;
use super::payload;
use super::transport::{ApiRequest, ApiResponse, Method, Transport};
use crate::config::ServerConfig;

/// An authenticated session, valid for exactly one site.
///
/// Consumed by `SessionClient::sign_out`, so a signed-out token cannot be
/// used again.
#[derive(Debug, PartialEq, Eq)]
pub struct Session {
    token: String,
    site_content_url: String,
}

impl Session {
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Content URL the session is scoped to (`""` for the default site).
    pub fn site_content_url(&self) -> &str {
        &self.site_content_url
    }

    /// Fails if this session belongs to another site.
    pub fn ensure_site(&self, site_content_url: &str) -> Result<(), MigrationError> {
        if self.site_content_url == site_content_url {
            Ok(())
        } else {
            Err(MigrationError::Api(format!(
                "Session for site '{}' cannot be used on site '{}'",
                self.site_content_url, site_content_url
            )))
        }
    }
}

/// Opens and closes sessions and issues authenticated calls.
///
/// Owns the configuration and the transport; the walker and the dispatcher
/// borrow it.
pub struct SessionClient<T: Transport> {
    config: ServerConfig,
    transport: T,
}

impl<T: Transport> SessionClient<T> {
    pub fn new(config: ServerConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `/api/{version}{suffix}`
    pub fn api_path(&self, suffix: &str) -> String {
        format!("/api/{}{}", self.config.api_version, suffix)
    }

    /// Signs in to `site_content_url`, or to the default site when `None`.
    pub async fn sign_in(
        &self,
        username: &str,
        password: &str,
        site_content_url: Option<&str>,
    ) -> Result<Session, MigrationError> {
        let site = site_content_url.unwrap_or("");
        debug!("Signing in as '{}' to site '{}'", username, site);

        let response = self
            .transport
            .send(ApiRequest {
                method: Method::Post,
                path: self.api_path("/auth/signin"),
                token: None,
                body: Some(payload::sign_in_body(username, password, site_content_url)),
            })
            .await?;

        if !response.is_success() {
            return Err(MigrationError::Auth(format!(
                "Sign-in to site '{}' rejected ({}): {}",
                site, response.status, response.body
            )));
        }
        let token = payload::token(&response.body).ok_or_else(|| {
            MigrationError::Auth(format!(
                "Sign-in to site '{}' returned no token: {}",
                site, response.body
            ))
        })?;

        Ok(Session {
            token,
            site_content_url: site.to_string(),
        })
    }

    /// Signs in with the administrator credentials from the configuration.
    pub async fn sign_in_admin(
        &self,
        site_content_url: Option<&str>,
    ) -> Result<Session, MigrationError> {
        self.sign_in(&self.config.username, &self.config.password, site_content_url)
            .await
    }

    /// Best-effort; any failure is logged and dropped.
    pub async fn sign_out(&self, session: Session) {
        let result = self
            .transport
            .send(ApiRequest {
                method: Method::Post,
                path: self.api_path("/auth/signout"),
                token: Some(session.token),
                body: None,
            })
            .await;
        match result {
            Ok(response) if response.is_success() => {
                debug!("Signed out of site '{}'", session.site_content_url)
            }
            Ok(response) => debug!(
                "Sign-out of site '{}' answered {}; ignoring",
                session.site_content_url, response.status
            ),
            Err(e) => debug!(
                "Sign-out of site '{}' failed: {}; ignoring",
                session.site_content_url, e
            ),
        }
    }

    pub async fn get(&self, session: &Session, suffix: &str) -> Result<ApiResponse, MigrationError> {
        self.authenticated(Method::Get, session, suffix, None).await
    }

    pub async fn put(
        &self,
        session: &Session,
        suffix: &str,
        body: Value,
    ) -> Result<ApiResponse, MigrationError> {
        self.authenticated(Method::Put, session, suffix, Some(body))
            .await
    }

    async fn authenticated(
        &self,
        method: Method,
        session: &Session,
        suffix: &str,
        body: Option<Value>,
    ) -> Result<ApiResponse, MigrationError> {
        self.transport
            .send(ApiRequest {
                method,
                path: self.api_path(suffix),
                token: Some(session.token.clone()),
                body,
            })
            .await
    }
}

impl SessionClient<super::transport::HttpTransport> {
    /// Client over HTTP, pointed at `config.server_url`.
    pub fn connect(config: ServerConfig) -> Self {
        info!("Using Tableau Server [{}] (API {})", config.server_url, config.api_version);
        let transport = super::transport::HttpTransport::new(config.server_url.clone());
        Self::new(config, transport)
    }
}
