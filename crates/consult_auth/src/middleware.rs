//! Role authentication middlewares
//!
//! Mounted with `axum::middleware::from_fn_with_state`, sharing the
//! [`TokenKeys`] as state. On success the authenticated account is put into
//! the request extensions as an [`AuthenticatedUser`].

use crate::error::AuthError;
use crate::token::{Role, TokenKeys};
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use consult_common::ConsultError;
use std::sync::Arc;
use tracing::{debug, warn};

pub const STUDENT_TOKEN_HEADER: &str = "token";
pub const LECTURER_TOKEN_HEADER: &str = "ltoken";
/// Header older lecturer clients still send.
pub const LEGACY_LECTURER_TOKEN_HEADER: &str = "dtoken";

/// The account a request was authenticated as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: String,
    pub role: Role,
}

fn header_token<'a>(headers: &'a HeaderMap, names: &[&str]) -> Option<&'a str> {
    names.iter().find_map(|name| {
        headers
            .get(*name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    })
}

fn authenticate(
    keys: &TokenKeys,
    headers: &HeaderMap,
    role: Role,
) -> Result<AuthenticatedUser, AuthError> {
    let names: &[&str] = match role {
        Role::Student => &[STUDENT_TOKEN_HEADER],
        Role::Lecturer => &[LECTURER_TOKEN_HEADER, LEGACY_LECTURER_TOKEN_HEADER],
    };
    let token = header_token(headers, names).ok_or(AuthError::MissingToken)?;
    let claims = keys.verify(token, role)?;
    Ok(AuthenticatedUser {
        id: claims.id,
        role: claims.role,
    })
}

async fn require_role(keys: &TokenKeys, role: Role, mut req: Request, next: Next) -> Response {
    match authenticate(keys, req.headers(), role) {
        Ok(user) => {
            debug!("Authenticated {} {}", role, user.id);
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(e) => {
            warn!("Rejected {} request to {}: {}", role, req.uri().path(), e);
            ConsultError::from(e).into_response()
        }
    }
}

/// Admits requests carrying a valid student token in the `token` header.
pub async fn student_auth(
    State(keys): State<Arc<TokenKeys>>,
    req: Request,
    next: Next,
) -> Response {
    require_role(&keys, Role::Student, req, next).await
}

/// Admits requests carrying a valid lecturer token in `ltoken` (or `dtoken`).
pub async fn lecturer_auth(
    State(keys): State<Arc<TokenKeys>>,
    req: Request,
    next: Next,
) -> Response {
    require_role(&keys, Role::Lecturer, req, next).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, middleware, routing::get, Extension, Router};
    use serde_json::Value;
    use tower::ServiceExt;

    async fn whoami(Extension(user): Extension<AuthenticatedUser>) -> String {
        user.id
    }

    fn app(keys: Arc<TokenKeys>) -> Router {
        Router::new()
            .route("/student", get(whoami))
            .route_layer(middleware::from_fn_with_state(keys.clone(), student_auth))
            .merge(
                Router::new()
                    .route("/lecturer", get(whoami))
                    .route_layer(middleware::from_fn_with_state(keys, lecturer_auth)),
            )
    }

    async fn call(keys: &Arc<TokenKeys>, uri: &str, header: Option<(&str, &str)>) -> (StatusCode, String) {
        let mut builder = axum::http::Request::builder().uri(uri);
        if let Some((name, value)) = header {
            builder = builder.header(name, value);
        }
        let response = app(keys.clone())
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn message(body: &str) -> String {
        let json: Value = serde_json::from_str(body).unwrap();
        assert_eq!(json["success"], false);
        json["message"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn student_token_reaches_handler() {
        let keys = Arc::new(TokenKeys::new(b"secret", 1));
        let token = keys.issue("s1", Role::Student).unwrap();

        let (status, body) = call(&keys, "/student", Some(("token", token.as_str()))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "s1");
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let keys = Arc::new(TokenKeys::new(b"secret", 1));

        let (status, body) = call(&keys, "/student", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message(&body), "Not Authorized Login Again");
    }

    #[tokio::test]
    async fn student_token_cannot_reach_lecturer_routes() {
        let keys = Arc::new(TokenKeys::new(b"secret", 1));
        let token = keys.issue("s1", Role::Student).unwrap();

        let (status, body) = call(&keys, "/lecturer", Some(("ltoken", token.as_str()))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message(&body), "Invalid token");
    }

    #[tokio::test]
    async fn lecturer_accepts_legacy_header() {
        let keys = Arc::new(TokenKeys::new(b"secret", 1));
        let token = keys.issue("l1", Role::Lecturer).unwrap();

        let (status, body) = call(&keys, "/lecturer", Some(("dtoken", token.as_str()))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "l1");
    }

    #[test]
    fn ltoken_wins_over_dtoken() {
        let mut headers = HeaderMap::new();
        headers.insert("ltoken", "first".parse().unwrap());
        headers.insert("dtoken", "second".parse().unwrap());
        assert_eq!(
            header_token(&headers, &[LECTURER_TOKEN_HEADER, LEGACY_LECTURER_TOKEN_HEADER]),
            Some("first")
        );

        headers.insert("ltoken", "".parse().unwrap());
        assert_eq!(
            header_token(&headers, &[LECTURER_TOKEN_HEADER, LEGACY_LECTURER_TOKEN_HEADER]),
            Some("second")
        );
    }
}
