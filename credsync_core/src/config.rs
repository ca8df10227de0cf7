use std::fmt;

use crate::api::errors::MigrationError;

pub const ENV_API_VERSION: &str = "TS_API_VERSION";
pub const ENV_SERVER_URL: &str = "TS_ADDRESS";
pub const ENV_USERNAME: &str = "TS_USERNAME";
pub const ENV_PASSWORD: &str = "TS_PASSWORD";

/// Everything needed to talk to one Tableau Server as an administrator.
///
/// Passed explicitly into `SessionClient::new`; nothing in the crate reads
/// the environment on its own.
#[derive(Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// REST API version, e.g. `3.19`.
    pub api_version: String,
    /// Base URL without a trailing slash, e.g. `https://tableau.acme.com`.
    pub server_url: String,
    pub username: String,
    pub password: String,
}

impl ServerConfig {
    pub fn new(
        api_version: impl Into<String>,
        server_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let server_url: String = server_url.into();
        Self {
            api_version: api_version.into(),
            server_url: server_url.trim_end_matches('/').to_string(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Reads `TS_API_VERSION`, `TS_ADDRESS`, `TS_USERNAME` and `TS_PASSWORD`.
    pub fn from_env() -> Result<Self, MigrationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, but with a caller-supplied variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, MigrationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| MigrationError::Config(format!("{key} is not set")))
        };
        Ok(Self::new(
            require(ENV_API_VERSION)?,
            require(ENV_SERVER_URL)?,
            require(ENV_USERNAME)?,
            require(ENV_PASSWORD)?,
        ))
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("api_version", &self.api_version)
            .field("server_url", &self.server_url)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}
