//! Register and login payloads shared by both roles

use crate::password::{is_strong_password, is_valid_email};
use consult_common::{non_blank, validation_error, ConsultError};
use serde::Deserialize;

pub const MISSING_DETAILS: &str = "Missing Details";
pub const INVALID_EMAIL: &str = "Please enter a valid email";
pub const WEAK_PASSWORD: &str = "Please enter a strong password";

/// Body of a registration request.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Registration data that passed validation. The password is still plain text.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    /// Checks presence first, then email shape, then password strength.
    pub fn validate(self) -> Result<NewAccount, ConsultError> {
        let (Some(name), Some(email), Some(password)) = (
            non_blank(self.name),
            non_blank(self.email),
            non_blank(self.password),
        ) else {
            return Err(validation_error(MISSING_DETAILS));
        };

        if !is_valid_email(&email) {
            return Err(validation_error(INVALID_EMAIL));
        }
        if !is_strong_password(&password) {
            return Err(validation_error(WEAK_PASSWORD));
        }

        Ok(NewAccount {
            name,
            email,
            password,
        })
    }
}

/// Body of a login request.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginRequest {
    /// Returns `(email, password)` when both are present.
    pub fn into_parts(self) -> Result<(String, String), ConsultError> {
        match (non_blank(self.email), non_blank(self.password)) {
            (Some(email), Some(password)) => Ok((email, password)),
            _ => Err(validation_error(MISSING_DETAILS)),
        }
    }
}
