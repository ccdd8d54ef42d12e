// --- File: crates/consult_common/src/http.rs ---
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::error::{ConsultError, HttpStatusCode};

/// Result type for handlers that answer with a JSON body.
pub type ApiResult<T> = Result<Json<T>, ConsultError>;

/// Message sent while the server runs without a database.
pub const DB_UNAVAILABLE_MESSAGE: &str = "Database is disabled/not connected right now.";

/// The `{ "success": true, "message": ... }` envelope used by state-changing endpoints.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// The `{ "success": true, "token": ... }` envelope returned by register and login.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
}

/// Builds a successful message envelope.
pub fn ok_message<T: Into<String>>(message: T) -> Json<MessageResponse> {
    Json(MessageResponse {
        success: true,
        message: message.into(),
    })
}

/// Builds a successful token envelope.
pub fn ok_token(token: String) -> Json<TokenResponse> {
    Json(TokenResponse {
        success: true,
        token,
    })
}

/// Unwraps a JSON body, turning a rejected body into a 400 envelope.
///
/// Handlers take `Result<Json<T>, JsonRejection>` so malformed input gets the
/// same `{ success: false, message }` shape as every other failure.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ConsultError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ConsultError::ParseError(rejection.body_text()))
}

/// Extension trait for ConsultError to convert it to an Axum HTTP response.
pub trait IntoHttpResponse {
    /// Converts the error into an Axum HTTP response.
    fn into_http_response(self) -> Response;
}

impl IntoHttpResponse for ConsultError {
    fn into_http_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.is_server_error() {
            error!("request failed: {}", self);
        }

        let body = Json(json!({
            "success": false,
            "message": self.public_message(),
        }));

        (status_code, body).into_response()
    }
}

impl IntoResponse for ConsultError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}
