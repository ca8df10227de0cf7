pub mod errors;
pub mod payload;
pub mod session;
pub mod transport;

// Re-export the modules here for easy import elsewhere.
pub use errors::*;
pub use session::*;
pub use transport::*;
