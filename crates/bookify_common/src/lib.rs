// --- File: crates/bookify_common/src/lib.rs ---

pub mod error; // Error handling
pub mod http; // HTTP error mapping
pub mod logging; // Logging utilities

// Re-export error types and utilities for easier access
pub use error::{service_unavailable, BookifyError, HttpStatusCode};

pub use logging::{init_from_config, init_with_level, log_error, log_result};
