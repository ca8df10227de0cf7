pub mod api;
pub mod config;
pub mod core;
pub mod storage;
pub mod utils;

// re‑export ergonomic entry points
pub use crate::api::{MigrationError, Session, SessionClient};
pub use crate::config::ServerConfig;
pub use crate::core::{export_connections, import_and_update, DirectoryWalker, RunReport, UpdateDispatcher};
