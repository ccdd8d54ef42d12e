//! HTTP handlers for the lecturer endpoints

use axum::extract::{rejection::JsonRejection, Extension, Json, State};
use consult_auth::{AuthenticatedUser, LoginRequest, TokenKeys};
use consult_common::{
    json_body, ok_message, ok_token, ApiResult, ConsultError, MessageResponse, TokenResponse,
    DB_UNAVAILABLE_MESSAGE,
};
use consult_config::AppConfig;
use consult_db::Store;
use std::sync::Arc;
use tracing::debug;

use crate::logic::{
    self, AppointmentIdRequest, DashboardResponse, LecturerAppointmentsResponse,
    LecturerListResponse, LecturerProfileResponse, LecturerRegisterRequest,
    UpdateLecturerProfileRequest,
};

/// Shared state for the lecturer handlers
#[derive(Clone)]
pub struct LecturerState {
    pub config: Arc<AppConfig>,
    /// `None` while the server runs without a database.
    pub store: Option<Store>,
    pub keys: Arc<TokenKeys>,
}

impl LecturerState {
    pub fn store(&self) -> Result<&Store, ConsultError> {
        self.store
            .as_ref()
            .ok_or_else(|| ConsultError::UnavailableError(DB_UNAVAILABLE_MESSAGE.to_string()))
    }
}

pub async fn register_handler(
    State(state): State<Arc<LecturerState>>,
    payload: Result<Json<LecturerRegisterRequest>, JsonRejection>,
) -> ApiResult<TokenResponse> {
    let request = json_body(payload)?;
    let token =
        logic::register_lecturer(state.store()?, &state.keys, &state.config.auth, request).await?;
    Ok(ok_token(token))
}

pub async fn login_handler(
    State(state): State<Arc<LecturerState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<TokenResponse> {
    let request = json_body(payload)?;
    let token = logic::login_lecturer(state.store()?, &state.keys, request).await?;
    Ok(ok_token(token))
}

pub async fn list_appointments_handler(
    State(state): State<Arc<LecturerState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<LecturerAppointmentsResponse> {
    let appointments = logic::list_appointments(state.store()?, &user.id).await?;
    Ok(Json(LecturerAppointmentsResponse {
        success: true,
        appointments,
    }))
}

pub async fn cancel_appointment_handler(
    State(state): State<Arc<LecturerState>>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: Result<Json<AppointmentIdRequest>, JsonRejection>,
) -> ApiResult<MessageResponse> {
    let request = json_body(payload)?;
    logic::cancel(state.store()?, &user.id, request).await?;
    Ok(ok_message("Appointment Cancelled"))
}

pub async fn complete_appointment_handler(
    State(state): State<Arc<LecturerState>>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: Result<Json<AppointmentIdRequest>, JsonRejection>,
) -> ApiResult<MessageResponse> {
    let request = json_body(payload)?;
    logic::complete(state.store()?, &user.id, request).await?;
    Ok(ok_message("Appointment Completed"))
}

/// Public listing for students choosing a lecturer.
pub async fn list_lecturers_handler(
    State(state): State<Arc<LecturerState>>,
) -> ApiResult<LecturerListResponse> {
    let lecturers = logic::list_lecturers(state.store()?).await?;
    Ok(Json(LecturerListResponse {
        success: true,
        lecturers,
    }))
}

pub async fn change_availability_handler(
    State(state): State<Arc<LecturerState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<MessageResponse> {
    logic::change_availability(state.store()?, &user.id).await?;
    Ok(ok_message("Availability Changed"))
}

pub async fn dashboard_handler(
    State(state): State<Arc<LecturerState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<DashboardResponse> {
    debug!("Dashboard requested by lecturer {}", user.id);
    let dash_data = logic::dashboard(state.store()?, &user.id).await?;
    Ok(Json(DashboardResponse {
        success: true,
        dash_data,
    }))
}

pub async fn profile_handler(
    State(state): State<Arc<LecturerState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<LecturerProfileResponse> {
    let profile_data = logic::profile(state.store()?, &user.id).await?;
    Ok(Json(LecturerProfileResponse {
        success: true,
        profile_data,
    }))
}

pub async fn update_profile_handler(
    State(state): State<Arc<LecturerState>>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: Result<Json<UpdateLecturerProfileRequest>, JsonRejection>,
) -> ApiResult<MessageResponse> {
    let request = json_body(payload)?;
    logic::update_profile(state.store()?, &user.id, request).await?;
    Ok(ok_message("Profile Updated"))
}
