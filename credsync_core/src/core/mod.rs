pub mod dispatcher;
pub mod runner;
pub mod walker;

// Re-export the modules here for easy import elsewhere.
pub use dispatcher::*;
pub use runner::*;
pub use walker::*;
