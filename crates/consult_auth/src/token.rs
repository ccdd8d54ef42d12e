//! Role tokens
//!
//! HS256 JWTs carrying the account id and the role they were issued for.
//! A token is only accepted by the middleware of its own role.

use crate::error::AuthError;
use chrono::{Duration, Utc};
use consult_config::AuthConfig;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which kind of account a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Lecturer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Student => write!(f, "student"),
            Role::Lecturer => write!(f, "lecturer"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Signing and verification keys derived from the shared secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenKeys")
            .field("ttl_hours", &self.ttl.num_hours())
            .finish_non_exhaustive()
    }
}

impl TokenKeys {
    pub fn new(secret: &[u8], ttl_hours: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            // Out-of-range lifetimes make `issue` fail instead of panicking here.
            ttl: Duration::try_hours(ttl_hours).unwrap_or(Duration::MAX),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.jwt_secret.as_bytes(), config.token_ttl_hours)
    }

    /// Issues a token for `id` valid for the configured lifetime.
    pub fn issue(&self, id: &str, role: Role) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::TokenIssue("token lifetime out of range".to_string()))?;
        let claims = Claims {
            id: id.to_string(),
            role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };
        self.sign(&claims)
    }

    pub(crate) fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AuthError::TokenIssue(e.to_string()))
    }

    /// Checks signature, expiry and role, returning the claims on success.
    pub fn verify(&self, token: &str, expected: Role) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidToken,
            }
        })?;

        if data.claims.role != expected {
            return Err(AuthError::InvalidToken);
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> TokenKeys {
        TokenKeys::new(b"test-secret", 1)
    }

    #[test]
    fn issued_token_verifies_for_its_role() {
        let keys = keys();
        let token = keys.issue("s1", Role::Student).unwrap();

        let claims = keys.verify(&token, Role::Student).unwrap();
        assert_eq!(claims.id, "s1");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn token_of_other_role_is_rejected() {
        let keys = keys();
        let token = keys.issue("l1", Role::Lecturer).unwrap();

        assert!(matches!(
            keys.verify(&token, Role::Student),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let token = TokenKeys::new(b"other-secret", 1)
            .issue("s1", Role::Student)
            .unwrap();

        assert!(matches!(
            keys().verify(&token, Role::Student),
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(
            keys().verify("not-a-jwt", Role::Student),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let keys = keys();
        let issued = Utc::now() - Duration::hours(3);
        let claims = Claims {
            id: "s1".into(),
            role: Role::Student,
            iat: issued.timestamp(),
            exp: (issued + Duration::hours(1)).timestamp(),
        };
        let token = keys.sign(&claims).unwrap();

        assert!(matches!(
            keys.verify(&token, Role::Student),
            Err(AuthError::Expired)
        ));
    }

    #[test]
    fn oversized_lifetime_fails_to_issue() {
        let keys = TokenKeys::new(b"test-secret", 10_000_000_000);
        assert!(matches!(
            keys.issue("s1", Role::Student),
            Err(AuthError::TokenIssue(_))
        ));

        let keys = TokenKeys::new(b"test-secret", i64::MAX);
        assert!(keys.issue("s1", Role::Student).is_err());
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Lecturer).unwrap(), "\"lecturer\"");
        assert_eq!(Role::Student.to_string(), "student");
    }
}
