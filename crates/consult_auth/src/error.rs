use consult_common::ConsultError;
use thiserror::Error;

/// Reasons a request could not be authenticated or credentials not processed.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Not Authorized Login Again")]
    MissingToken,

    /// Bad signature, malformed token or a token of the other role.
    #[error("Invalid token")]
    InvalidToken,

    #[error("Session expired, login again")]
    Expired,

    #[error("Failed to issue token: {0}")]
    TokenIssue(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

impl From<AuthError> for ConsultError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken | AuthError::InvalidToken | AuthError::Expired => {
                ConsultError::AuthError(err.to_string())
            }
            AuthError::TokenIssue(_) | AuthError::Hashing(_) => {
                ConsultError::InternalError(err.to_string())
            }
        }
    }
}
