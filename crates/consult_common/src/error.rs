// --- File: crates/consult_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type for the consultation backend.
///
/// Every crate converts its own errors into this type at the handler boundary.
/// The inner string of the client-facing variants is the exact message sent
/// back in the `{ "success": false, "message": ... }` envelope.
#[derive(Error, Debug)]
pub enum ConsultError {
    /// Request data is missing or malformed
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Missing, invalid or expired credentials
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Authenticated, but acting on someone else's resource
    #[error("Forbidden: {0}")]
    ForbiddenError(String),

    #[error("Not found: {0}")]
    NotFoundError(String),

    /// The action clashes with the current state (slot taken, duplicate email, ...)
    #[error("Conflict: {0}")]
    ConflictError(String),

    /// The database is not configured or not reachable
    #[error("Service unavailable: {0}")]
    UnavailableError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to parse data: {0}")]
    ParseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for ConsultError {
    fn status_code(&self) -> u16 {
        match self {
            ConsultError::ValidationError(_) => 400,
            ConsultError::ParseError(_) => 400,
            ConsultError::AuthError(_) => 401,
            ConsultError::ForbiddenError(_) => 403,
            ConsultError::NotFoundError(_) => 404,
            ConsultError::ConflictError(_) => 409,
            ConsultError::UnavailableError(_) => 503,
            ConsultError::DatabaseError(_) => 500,
            ConsultError::ConfigError(_) => 500,
            ConsultError::InternalError(_) => 500,
        }
    }
}

/// Message returned to clients for server-side failures. The detail is only logged.
pub const INTERNAL_MESSAGE: &str = "Something went wrong, please try again later";

impl ConsultError {
    /// The message that is safe to show to the client.
    pub fn public_message(&self) -> &str {
        match self {
            ConsultError::ValidationError(m)
            | ConsultError::ParseError(m)
            | ConsultError::AuthError(m)
            | ConsultError::ForbiddenError(m)
            | ConsultError::NotFoundError(m)
            | ConsultError::ConflictError(m)
            | ConsultError::UnavailableError(m) => m,
            ConsultError::DatabaseError(_)
            | ConsultError::ConfigError(_)
            | ConsultError::InternalError(_) => INTERNAL_MESSAGE,
        }
    }

    /// Whether this error is a server-side failure rather than a rejected request.
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500 && !matches!(self, ConsultError::UnavailableError(_))
    }
}

impl From<serde_json::Error> for ConsultError {
    fn from(err: serde_json::Error) -> Self {
        ConsultError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for ConsultError {
    fn from(err: std::io::Error) -> Self {
        ConsultError::InternalError(err.to_string())
    }
}

// Utility functions for error handling
pub fn validation_error<T: fmt::Display>(message: T) -> ConsultError {
    ConsultError::ValidationError(message.to_string())
}

pub fn auth_error<T: fmt::Display>(message: T) -> ConsultError {
    ConsultError::AuthError(message.to_string())
}

pub fn forbidden<T: fmt::Display>(message: T) -> ConsultError {
    ConsultError::ForbiddenError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> ConsultError {
    ConsultError::NotFoundError(message.to_string())
}

pub fn conflict<T: fmt::Display>(message: T) -> ConsultError {
    ConsultError::ConflictError(message.to_string())
}

pub fn internal_error<T: fmt::Display>(message: T) -> ConsultError {
    ConsultError::InternalError(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(validation_error("Missing Details").status_code(), 400);
        assert_eq!(auth_error("Not Authorized Login Again").status_code(), 401);
        assert_eq!(forbidden("Unauthorized action").status_code(), 403);
        assert_eq!(not_found("Lecturer not found").status_code(), 404);
        assert_eq!(conflict("Slot Not Available").status_code(), 409);
        assert_eq!(
            ConsultError::UnavailableError("db".into()).status_code(),
            503
        );
        assert_eq!(internal_error("boom").status_code(), 500);
    }

    #[test]
    fn server_failures_hide_their_detail() {
        let err = ConsultError::DatabaseError("no such table: students".into());
        assert_eq!(err.public_message(), INTERNAL_MESSAGE);
        assert!(err.is_server_error());

        let err = conflict("Slot Not Available");
        assert_eq!(err.public_message(), "Slot Not Available");
        assert!(!err.is_server_error());
        assert!(!ConsultError::UnavailableError("x".into()).is_server_error());
    }
}
