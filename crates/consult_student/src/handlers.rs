//! HTTP handlers for the student endpoints
//!
//! Protected handlers read the caller from the [`AuthenticatedUser`] the
//! student middleware put into the request; ids in request bodies are never
//! trusted. Without a database every data handler answers 503.

use axum::extract::{rejection::JsonRejection, Extension, Json, State};
use consult_auth::{AuthenticatedUser, LoginRequest, RegisterRequest, TokenKeys};
use consult_common::{
    json_body, ok_message, ok_token, ApiResult, ConsultError, MessageResponse, TokenResponse,
    DB_UNAVAILABLE_MESSAGE,
};
use consult_config::AppConfig;
use consult_db::Store;
use std::sync::Arc;
use tracing::debug;

use crate::logic::{
    self, AppointmentIdRequest, BookAppointmentRequest, StudentAppointmentsResponse,
    StudentProfileResponse, UpdateProfileRequest,
};

/// Shared state for the student handlers
#[derive(Clone)]
pub struct StudentState {
    pub config: Arc<AppConfig>,
    /// `None` while the server runs without a database.
    pub store: Option<Store>,
    pub keys: Arc<TokenKeys>,
}

impl StudentState {
    pub fn store(&self) -> Result<&Store, ConsultError> {
        self.store
            .as_ref()
            .ok_or_else(|| ConsultError::UnavailableError(DB_UNAVAILABLE_MESSAGE.to_string()))
    }
}

pub async fn register_handler(
    State(state): State<Arc<StudentState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<TokenResponse> {
    let request = json_body(payload)?;
    let token =
        logic::register_student(state.store()?, &state.keys, &state.config.auth, request).await?;
    Ok(ok_token(token))
}

pub async fn login_handler(
    State(state): State<Arc<StudentState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<TokenResponse> {
    let request = json_body(payload)?;
    let token = logic::login_student(state.store()?, &state.keys, request).await?;
    Ok(ok_token(token))
}

pub async fn get_profile_handler(
    State(state): State<Arc<StudentState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<StudentProfileResponse> {
    debug!("Profile requested by student {}", user.id);
    let student = logic::get_profile(state.store()?, &user.id).await?;
    Ok(Json(StudentProfileResponse {
        success: true,
        student_data: student,
    }))
}

pub async fn update_profile_handler(
    State(state): State<Arc<StudentState>>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> ApiResult<MessageResponse> {
    let request = json_body(payload)?;
    logic::update_profile(state.store()?, &user.id, request).await?;
    Ok(ok_message("Profile Updated"))
}

pub async fn book_appointment_handler(
    State(state): State<Arc<StudentState>>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: Result<Json<BookAppointmentRequest>, JsonRejection>,
) -> ApiResult<MessageResponse> {
    let request = json_body(payload)?;
    logic::book(state.store()?, &user.id, request).await?;
    Ok(ok_message("Consultation Appointment Booked"))
}

pub async fn list_appointments_handler(
    State(state): State<Arc<StudentState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<StudentAppointmentsResponse> {
    let appointments = logic::list_appointments(state.store()?, &user.id).await?;
    Ok(Json(StudentAppointmentsResponse {
        success: true,
        appointments,
    }))
}

pub async fn cancel_appointment_handler(
    State(state): State<Arc<StudentState>>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: Result<Json<AppointmentIdRequest>, JsonRejection>,
) -> ApiResult<MessageResponse> {
    let request = json_body(payload)?;
    logic::cancel(state.store()?, &user.id, request).await?;
    Ok(ok_message("Appointment Cancelled"))
}
