// --- File: crates/consult_lecturer/src/logic.rs ---

use consult_auth::{hash_password, verify_password, LoginRequest, RegisterRequest, Role, TokenKeys};
use consult_common::{
    auth_error, conflict, forbidden, non_blank, not_found, validation_error, AddressInput,
    Appointment, ConsultError, Lecturer, PublicLecturer,
};
use consult_config::AuthConfig;
use consult_db::{
    cancel_appointment, complete_appointment, AppointmentRepository, Cancellation, Completion,
    LecturerProfileUpdate, LecturerRepository, Store,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const LECTURER_EXISTS: &str = "Lecturer already exists";
pub const LECTURER_MISSING: &str = "Lecturer not found";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const MISSING_DETAILS: &str = "Missing Details";
pub const UNAUTHORIZED_ACTION: &str = "Unauthorized action";

// --- Request and response bodies ---

/// Registration body: the common credentials plus optional profile texts.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LecturerRegisterRequest {
    #[serde(flatten)]
    pub account: RegisterRequest,
    #[serde(default)]
    pub speciality: Option<String>,
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub about: Option<String>,
}

/// Profile changes; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateLecturerProfileRequest {
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub address: Option<AddressInput>,
    #[serde(default)]
    pub available: Option<bool>,
    #[serde(default)]
    pub speciality: Option<String>,
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub about: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AppointmentIdRequest {
    #[serde(default)]
    pub appointment_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LecturerAppointmentsResponse {
    pub success: bool,
    pub appointments: Vec<Appointment>,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LecturerListResponse {
    pub success: bool,
    pub lecturers: Vec<PublicLecturer>,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct LecturerProfileResponse {
    pub success: bool,
    pub profile_data: Lecturer,
}

/// Figures shown on the lecturer dashboard.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    /// Number of appointments, whatever their state.
    pub appointments: usize,
    /// Number of distinct students among them.
    pub students: usize,
    /// All appointments, newest booking first.
    pub latest_appointments: Vec<Appointment>,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub success: bool,
    pub dash_data: DashboardData,
}

// --- Operations ---

/// Registers a lecturer and returns a fresh lecturer token.
pub async fn register_lecturer(
    store: &Store,
    keys: &TokenKeys,
    auth: &AuthConfig,
    request: LecturerRegisterRequest,
) -> Result<String, ConsultError> {
    let account = request.account.validate()?;
    debug!("Registering lecturer {}", account.email);

    if store.lecturers.find_by_email(&account.email).await?.is_some() {
        warn!("Registration with taken email {}", account.email);
        return Err(conflict(LECTURER_EXISTS));
    }

    let hash = hash_password(account.password, auth.bcrypt_cost).await?;
    let mut lecturer =
        Lecturer::new(Uuid::new_v4().to_string(), account.name, account.email, hash);
    lecturer.speciality = request.speciality.unwrap_or_default();
    lecturer.degree = request.degree.unwrap_or_default();
    lecturer.experience = request.experience.unwrap_or_default();
    lecturer.about = request.about.unwrap_or_default();

    store.lecturers.create(&lecturer).await?;

    info!("Lecturer {} registered", lecturer.id);
    Ok(keys.issue(&lecturer.id, Role::Lecturer)?)
}

/// Checks credentials and returns a lecturer token. Unknown emails and wrong
/// passwords get the same answer.
pub async fn login_lecturer(
    store: &Store,
    keys: &TokenKeys,
    request: LoginRequest,
) -> Result<String, ConsultError> {
    let (email, password) = request.into_parts()?;

    let Some(lecturer) = store.lecturers.find_by_email(&email).await? else {
        warn!("Login for unknown lecturer {}", email);
        return Err(auth_error(INVALID_CREDENTIALS));
    };

    if !verify_password(password, lecturer.password.clone()).await? {
        warn!("Wrong password for lecturer {}", lecturer.id);
        return Err(auth_error(INVALID_CREDENTIALS));
    }

    Ok(keys.issue(&lecturer.id, Role::Lecturer)?)
}

async fn load_lecturer(store: &Store, lecturer_id: &str) -> Result<Lecturer, ConsultError> {
    store
        .lecturers
        .find_by_id(lecturer_id)
        .await?
        .ok_or_else(|| not_found(LECTURER_MISSING))
}

/// Loads an appointment the lecturer owns.
async fn owned_appointment(
    store: &Store,
    lecturer_id: &str,
    appointment_id: Option<String>,
) -> Result<Appointment, ConsultError> {
    let Some(appointment_id) = non_blank(appointment_id) else {
        return Err(validation_error(MISSING_DETAILS));
    };

    let appointment = store
        .appointments
        .find_by_id(&appointment_id)
        .await?
        .ok_or_else(|| not_found("Appointment not found"))?;

    if appointment.lecturer_id != lecturer_id {
        warn!(
            "Lecturer {} tried to change appointment {} of lecturer {}",
            lecturer_id, appointment.id, appointment.lecturer_id
        );
        return Err(forbidden(UNAUTHORIZED_ACTION));
    }
    Ok(appointment)
}

pub async fn list_appointments(
    store: &Store,
    lecturer_id: &str,
) -> Result<Vec<Appointment>, ConsultError> {
    Ok(store.appointments.find_by_lecturer(lecturer_id).await?)
}

/// Cancels one of the lecturer's appointments and frees the slot.
pub async fn cancel(
    store: &Store,
    lecturer_id: &str,
    request: AppointmentIdRequest,
) -> Result<(), ConsultError> {
    let appointment = owned_appointment(store, lecturer_id, request.appointment_id).await?;

    match cancel_appointment(store, &appointment).await? {
        Cancellation::Cancelled | Cancellation::AlreadyCancelled => Ok(()),
        Cancellation::AlreadyCompleted => Err(conflict("Completed appointments cannot be cancelled")),
    }
}

pub async fn complete(
    store: &Store,
    lecturer_id: &str,
    request: AppointmentIdRequest,
) -> Result<(), ConsultError> {
    let appointment = owned_appointment(store, lecturer_id, request.appointment_id).await?;

    match complete_appointment(store, &appointment).await? {
        Completion::Completed | Completion::AlreadyCompleted => Ok(()),
        Completion::AlreadyCancelled => Err(conflict("Cancelled appointments cannot be completed")),
    }
}

/// Every lecturer as shown to students.
pub async fn list_lecturers(store: &Store) -> Result<Vec<PublicLecturer>, ConsultError> {
    let lecturers = store.lecturers.find_all().await?;
    Ok(lecturers.into_iter().map(PublicLecturer::from).collect())
}

pub async fn change_availability(store: &Store, lecturer_id: &str) -> Result<(), ConsultError> {
    if !store.lecturers.toggle_available(lecturer_id).await? {
        return Err(not_found(LECTURER_MISSING));
    }
    info!("Lecturer {} toggled availability", lecturer_id);
    Ok(())
}

pub async fn profile(store: &Store, lecturer_id: &str) -> Result<Lecturer, ConsultError> {
    load_lecturer(store, lecturer_id).await
}

pub async fn update_profile(
    store: &Store,
    lecturer_id: &str,
    request: UpdateLecturerProfileRequest,
) -> Result<(), ConsultError> {
    let address = request
        .address
        .map(AddressInput::into_address)
        .transpose()
        .map_err(|_| validation_error("Address must be an object with line1 and line2"))?;
    let update = LecturerProfileUpdate {
        address,
        available: request.available,
        speciality: request.speciality,
        degree: request.degree,
        experience: request.experience,
        about: request.about,
    };

    if !store.lecturers.update_profile(lecturer_id, &update).await? {
        return Err(not_found(LECTURER_MISSING));
    }
    info!("Lecturer {} updated their profile", lecturer_id);
    Ok(())
}

/// Builds dashboard figures from the lecturer's appointments (oldest first).
pub fn summarize(mut appointments: Vec<Appointment>) -> DashboardData {
    let students = appointments
        .iter()
        .map(|a| a.student_id.as_str())
        .collect::<HashSet<_>>()
        .len();
    appointments.reverse();

    DashboardData {
        appointments: appointments.len(),
        students,
        latest_appointments: appointments,
    }
}

pub async fn dashboard(store: &Store, lecturer_id: &str) -> Result<DashboardData, ConsultError> {
    let appointments = store.appointments.find_by_lecturer(lecturer_id).await?;
    Ok(summarize(appointments))
}
