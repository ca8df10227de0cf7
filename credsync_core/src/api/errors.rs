use std::fmt::{self, Display};

/// A central error enum for everything that can stop an export or import run.
#[derive(Debug)]
pub enum MigrationError {
    /// The server rejected the sign-in (non-2xx or no token in the body).
    Auth(String),
    /// A listing call answered with a non-2xx status or an unexpected shape.
    Api(String),
    /// A row of the import table is missing a required value.
    Validation(String),
    /// A required configuration value is missing.
    Config(String),
    /// The request never produced an HTTP response.
    Transport(String),
    IoError(std::io::Error),
    CsvError(csv::Error),
}

/// Convert from std::io::Error.
impl From<std::io::Error> for MigrationError {
    fn from(err: std::io::Error) -> MigrationError {
        MigrationError::IoError(err)
    }
}

/// Convert from csv::Error.
/// Without this, `?` won't work on the csv reader/writer calls.
impl From<csv::Error> for MigrationError {
    fn from(err: csv::Error) -> Self {
        MigrationError::CsvError(err)
    }
}

/// Convert from reqwest::Error.
impl From<reqwest::Error> for MigrationError {
    fn from(err: reqwest::Error) -> Self {
        MigrationError::Transport(err.to_string())
    }
}

impl Display for MigrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationError::Auth(msg) => write!(f, "Authentication error: {}", msg),
            MigrationError::Api(msg) => write!(f, "API error: {}", msg),
            MigrationError::Validation(msg) => write!(f, "Validation error: {}", msg),
            MigrationError::Config(msg) => write!(f, "Configuration error: {}", msg),
            MigrationError::Transport(msg) => write!(f, "Transport error: {}", msg),
            MigrationError::IoError(e) => write!(f, "IO error: {}", e),
            MigrationError::CsvError(e) => write!(f, "CSV error: {}", e),
        }
    }
}

impl std::error::Error for MigrationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MigrationError::IoError(e) => Some(e),
            MigrationError::CsvError(e) => Some(e),
            _ => None,
        }
    }
}

/// A single credential update the server refused.
///
/// Never aborts a run; it ends up in the `RunReport` as a failed outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionUpdateError {
    pub site_name: String,
    pub datasource_name: String,
    pub connection_id: String,
    /// Raw response body (or transport error text) as received.
    pub response: String,
}

impl Display for ConnectionUpdateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error while updating {} on site {}:\n{}",
            self.datasource_name, self.site_name, self.response
        )
    }
}

impl std::error::Error for ConnectionUpdateError {}
