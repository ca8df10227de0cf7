pub mod export;
pub mod import;
pub mod record;

// Re-export the modules here for easy import elsewhere.
pub use export::*;
pub use import::*;
pub use record::*;
