// --- File: crates/consult_student/src/logic.rs ---

use consult_auth::{hash_password, verify_password, LoginRequest, RegisterRequest, Role, TokenKeys};
use consult_common::{
    auth_error, conflict, forbidden, non_blank, not_found, validation_error, AddressInput,
    Appointment, ConsultError, Student,
};
use consult_config::AuthConfig;
use consult_db::{
    book_appointment, cancel_appointment, AppointmentRepository, Booking, Cancellation, Store,
    StudentProfileUpdate, StudentRepository,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const STUDENT_EXISTS: &str = "Student already exists";
pub const STUDENT_MISSING: &str = "Student does not exist";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const DATA_MISSING: &str = "Data Missing";
pub const MISSING_DETAILS: &str = "Missing Details";
pub const LECTURER_NOT_AVAILABLE: &str = "Lecturer Not Available";
pub const SLOT_NOT_AVAILABLE: &str = "Slot Not Available";
pub const UNAUTHORIZED_ACTION: &str = "Unauthorized action";
pub const INVALID_ADDRESS: &str = "Address must be an object with line1 and line2";

// --- Request and response bodies ---

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub address: Option<AddressInput>,
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct BookAppointmentRequest {
    #[serde(default)]
    pub lecturer_id: Option<String>,
    #[serde(default)]
    pub slot_date: Option<String>,
    #[serde(default)]
    pub slot_time: Option<String>,
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
#[serde(rename_all = "camelCase")]
pub struct StudentProfileResponse {
    pub success: bool,
    pub student_data: Student,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StudentAppointmentsResponse {
    pub success: bool,
    pub appointments: Vec<Appointment>,
}

// --- Operations ---

/// Registers a student and returns a fresh student token.
pub async fn register_student(
    store: &Store,
    keys: &TokenKeys,
    auth: &AuthConfig,
    request: RegisterRequest,
) -> Result<String, ConsultError> {
    let account = request.validate()?;
    debug!("Registering student {}", account.email);

    if store.students.find_by_email(&account.email).await?.is_some() {
        warn!("Registration with taken email {}", account.email);
        return Err(conflict(STUDENT_EXISTS));
    }

    let hash = hash_password(account.password, auth.bcrypt_cost).await?;
    let student = Student::new(Uuid::new_v4().to_string(), account.name, account.email, hash);

    // A concurrent registration of the same email surfaces as a duplicate.
    store.students.create(&student).await?;

    info!("Student {} registered", student.id);
    Ok(keys.issue(&student.id, Role::Student)?)
}

/// Checks credentials and returns a student token.
pub async fn login_student(
    store: &Store,
    keys: &TokenKeys,
    request: LoginRequest,
) -> Result<String, ConsultError> {
    let (email, password) = request.into_parts()?;

    let Some(student) = store.students.find_by_email(&email).await? else {
        warn!("Login for unknown student {}", email);
        return Err(not_found(STUDENT_MISSING));
    };

    if !verify_password(password, student.password.clone()).await? {
        warn!("Wrong password for student {}", student.id);
        return Err(auth_error(INVALID_CREDENTIALS));
    }

    Ok(keys.issue(&student.id, Role::Student)?)
}

async fn load_student(store: &Store, student_id: &str) -> Result<Student, ConsultError> {
    store
        .students
        .find_by_id(student_id)
        .await?
        .ok_or_else(|| not_found(STUDENT_MISSING))
}

pub async fn get_profile(store: &Store, student_id: &str) -> Result<Student, ConsultError> {
    load_student(store, student_id).await
}

pub async fn update_profile(
    store: &Store,
    student_id: &str,
    request: UpdateProfileRequest,
) -> Result<(), ConsultError> {
    let (Some(name), Some(phone), Some(dob), Some(gender)) = (
        non_blank(request.name),
        non_blank(request.phone),
        non_blank(request.dob),
        non_blank(request.gender),
    ) else {
        return Err(validation_error(DATA_MISSING));
    };

    let address = request
        .address
        .map(AddressInput::into_address)
        .transpose()
        .map_err(|_| validation_error(INVALID_ADDRESS))?;
    let update = StudentProfileUpdate {
        name,
        phone,
        address,
        dob,
        gender,
    };

    if !store.students.update_profile(student_id, &update).await? {
        return Err(not_found(STUDENT_MISSING));
    }
    info!("Student {} updated their profile", student_id);
    Ok(())
}

pub async fn book(
    store: &Store,
    student_id: &str,
    request: BookAppointmentRequest,
) -> Result<Appointment, ConsultError> {
    let (Some(lecturer_id), Some(slot_date), Some(slot_time)) = (
        non_blank(request.lecturer_id),
        non_blank(request.slot_date),
        non_blank(request.slot_time),
    ) else {
        return Err(validation_error(MISSING_DETAILS));
    };

    let student = load_student(store, student_id).await?;

    match book_appointment(store, &student, &lecturer_id, &slot_date, &slot_time).await? {
        Booking::Booked(appointment) => Ok(appointment),
        Booking::LecturerNotAvailable => {
            warn!("Booking with unavailable lecturer {}", lecturer_id);
            Err(conflict(LECTURER_NOT_AVAILABLE))
        }
        Booking::SlotTaken => {
            warn!("Slot {} {} of lecturer {} is taken", slot_date, slot_time, lecturer_id);
            Err(conflict(SLOT_NOT_AVAILABLE))
        }
        Booking::UnknownLecturer => Err(not_found("Lecturer not found")),
    }
}

pub async fn list_appointments(
    store: &Store,
    student_id: &str,
) -> Result<Vec<Appointment>, ConsultError> {
    Ok(store.appointments.find_by_student(student_id).await?)
}

/// Cancels one of the student's appointments. Cancelling twice is harmless.
pub async fn cancel(
    store: &Store,
    student_id: &str,
    request: AppointmentIdRequest,
) -> Result<(), ConsultError> {
    let Some(appointment_id) = non_blank(request.appointment_id) else {
        return Err(validation_error(MISSING_DETAILS));
    };

    let appointment = store
        .appointments
        .find_by_id(&appointment_id)
        .await?
        .ok_or_else(|| not_found("Appointment not found"))?;

    if appointment.student_id != student_id {
        warn!(
            "Student {} tried to cancel appointment {} of student {}",
            student_id, appointment.id, appointment.student_id
        );
        return Err(forbidden(UNAUTHORIZED_ACTION));
    }

    match cancel_appointment(store, &appointment).await? {
        Cancellation::Cancelled | Cancellation::AlreadyCancelled => Ok(()),
        Cancellation::AlreadyCompleted => Err(conflict("Completed appointments cannot be cancelled")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_request_takes_encoded_address() {
        let request: UpdateProfileRequest = serde_json::from_value(serde_json::json!({
            "name": "Ada",
            "address": "{\"line1\":\"1 Main St\",\"line2\":\"\"}"
        }))
        .unwrap();
        assert!(matches!(request.address, Some(AddressInput::Encoded(_))));
        assert!(request.phone.is_none());
    }

    #[test]
    fn booking_request_uses_camel_case() {
        let request: BookAppointmentRequest = serde_json::from_value(serde_json::json!({
            "lecturerId": "l1", "slotDate": "15_3_2025", "slotTime": "10:00 AM"
        }))
        .unwrap();
        assert_eq!(request.lecturer_id.as_deref(), Some("l1"));
        assert_eq!(request.slot_time.as_deref(), Some("10:00 AM"));
    }
}
