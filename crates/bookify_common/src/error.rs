// --- File: crates/bookify_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type shared by the Bookify crates.
///
/// Feature crates keep their own error enums and implement `From<...> for BookifyError`
/// at the HTTP boundary.
#[derive(Error, Debug)]
pub enum BookifyError {
    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The backing store failed or could not be reached
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Error occurred due to a conflict (e.g., slot already booked)
    #[error("Conflict: {0}")]
    ConflictError(String),

    /// Error occurred due to a resource not being found
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Maps an error onto an HTTP status code.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for BookifyError {
    fn status_code(&self) -> u16 {
        match self {
            BookifyError::ConfigError(_) => 500,
            BookifyError::ValidationError(_) => 400,
            BookifyError::ServiceUnavailable(_) => 503,
            BookifyError::ConflictError(_) => 409,
            BookifyError::NotFoundError(_) => 404,
            BookifyError::InternalError(_) => 500,
        }
    }
}

/// Shorthand used by handlers when a feature is switched off or a dependency is down.
pub fn service_unavailable<T: fmt::Display>(message: T) -> BookifyError {
    BookifyError::ServiceUnavailable(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        let cases = [
            (BookifyError::ValidationError("bad".into()), 400),
            (BookifyError::ConflictError("taken".into()), 409),
            (BookifyError::NotFoundError("gone".into()), 404),
            (service_unavailable("db down"), 503),
            (BookifyError::ConfigError("missing".into()), 500),
            (BookifyError::InternalError("oops".into()), 500),
        ];
        for (err, code) in cases {
            assert_eq!(err.status_code(), code, "{}", err);
        }
    }

    #[test]
    fn service_unavailable_keeps_message() {
        assert_eq!(
            service_unavailable("Planner service is disabled.").to_string(),
            "Service unavailable: Planner service is disabled."
        );
    }
}
