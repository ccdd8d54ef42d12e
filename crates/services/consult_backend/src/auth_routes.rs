//! `/api/auth`: one registration endpoint for both roles

use axum::{
    extract::{rejection::JsonRejection, Json, State},
    routing::post,
    Router,
};
use consult_auth::RegisterRequest;
use consult_common::{json_body, ok_token, validation_error, ApiResult, TokenResponse};
use consult_lecturer::logic::{register_lecturer, LecturerRegisterRequest};
use consult_student::logic::register_student;
use serde_json::Value;
use tracing::debug;

use crate::app_state::AppState;

pub const INVALID_ROLE: &str = "Invalid role. Use role: 'student' or 'lecturer'.";

/// `POST /register` with a `role` field deciding which account is created.
pub async fn register_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<TokenResponse> {
    let body = json_body(payload)?;
    let role = body
        .get("role")
        .and_then(Value::as_str)
        .map(str::to_lowercase)
        .unwrap_or_default();
    debug!("Unified registration for role '{}'", role);

    let token = match role.as_str() {
        "student" => {
            let store = state.store()?;
            let request: RegisterRequest = serde_json::from_value(body)?;
            register_student(store, &state.keys, &state.config.auth, request).await?
        }
        "lecturer" => {
            let store = state.store()?;
            let request: LecturerRegisterRequest = serde_json::from_value(body)?;
            register_lecturer(store, &state.keys, &state.config.auth, request).await?
        }
        _ => return Err(validation_error(INVALID_ROLE)),
    };
    Ok(ok_token(token))
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/register", post(register_handler))
        .with_state(state)
}
