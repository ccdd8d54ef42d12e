//! Password hashing and credential format checks

use crate::error::AuthError;
use tracing::warn;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Hashes a password with bcrypt on the blocking pool.
pub async fn hash_password(password: String, cost: u32) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Checks a password against a stored bcrypt hash on the blocking pool.
///
/// A stored value that is not a bcrypt hash never matches.
pub async fn verify_password(password: String, hash: String) -> Result<bool, AuthError> {
    let outcome = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?;

    match outcome {
        Ok(matches) => Ok(matches),
        Err(e) => {
            warn!("Stored password hash could not be checked: {}", e);
            Ok(false)
        }
    }
}

/// Loose structural email check: a local part, one `@`, a dotted domain, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.len() < 6 || email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("ada@uni.edu"));
        assert!(is_valid_email("first.last@dept.uni.ac.uk"));
        assert!(!is_valid_email("ada@uni"));
        assert!(!is_valid_email("@uni.edu"));
        assert!(!is_valid_email("ada@@uni.edu"));
        assert!(!is_valid_email("ada lovelace@uni.edu"));
        assert!(!is_valid_email("ada@uni.edu."));
        assert!(!is_valid_email("a@b.c"));
    }

    #[test]
    fn password_length_counts_characters() {
        assert!(is_strong_password("12345678"));
        assert!(!is_strong_password("1234567"));
        assert!(is_strong_password("ääääääää"));
    }

    #[tokio::test]
    async fn hash_then_verify() {
        let hash = hash_password("correct horse".into(), 4).await.unwrap();
        assert_ne!(hash, "correct horse");
        assert!(verify_password("correct horse".into(), hash.clone()).await.unwrap());
        assert!(!verify_password("wrong horse".into(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn garbage_hash_never_matches() {
        assert!(!verify_password("anything".into(), "plain".into()).await.unwrap());
    }

    #[tokio::test]
    async fn invalid_cost_is_an_error() {
        assert!(matches!(
            hash_password("password".into(), 99).await,
            Err(AuthError::Hashing(_))
        ));
    }
}
