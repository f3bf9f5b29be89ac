pub mod errors;
pub mod wifi_manager;

// Re-export the modules here for easy import elsewhere.
pub use errors::*;
pub use wifi_manager::*;
