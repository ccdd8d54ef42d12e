// --- File: crates/consult_student/src/doc.rs ---

#![cfg(feature = "openapi")]
// The doc_* functions only carry the path attributes for utoipa
#![allow(dead_code)]

use consult_auth::{LoginRequest, RegisterRequest};
use consult_common::{MessageResponse, TokenResponse};
use utoipa::OpenApi;

use crate::logic::{
    AppointmentIdRequest, BookAppointmentRequest, StudentAppointmentsResponse,
    StudentProfileResponse, UpdateProfileRequest,
};

#[utoipa::path(
    post,
    path = "/api/student/register",
    request_body(
        content = RegisterRequest,
        example = json!({"name": "Ada Lovelace", "email": "ada@uni.edu", "password": "analytical"})
    ),
    responses(
        (status = 200, description = "Student registered", body = TokenResponse),
        (status = 400, description = "Missing Details / invalid email / weak password", body = MessageResponse),
        (status = 409, description = "Student already exists", body = MessageResponse),
        (status = 503, description = "Database is disabled/not connected right now.")
    ),
    tag = "Student"
)]
fn doc_register() {}

#[utoipa::path(
    post,
    path = "/api/student/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = TokenResponse),
        (status = 401, description = "Invalid credentials", body = MessageResponse),
        (status = 404, description = "Student does not exist", body = MessageResponse)
    ),
    tag = "Student"
)]
fn doc_login() {}

#[utoipa::path(
    get,
    path = "/api/student/get-profile",
    params(("token" = String, Header, description = "Student token")),
    responses(
        (status = 200, description = "The authenticated student", body = StudentProfileResponse),
        (status = 401, description = "Missing, invalid or expired token", body = MessageResponse)
    ),
    tag = "Student"
)]
fn doc_get_profile() {}

#[utoipa::path(
    post,
    path = "/api/student/update-profile",
    params(("token" = String, Header, description = "Student token")),
    request_body(
        content = UpdateProfileRequest,
        example = json!({
            "name": "Ada Lovelace",
            "phone": "0123456789",
            "address": {"line1": "12 St James's Square", "line2": "London"},
            "dob": "1815-12-10",
            "gender": "Female"
        })
    ),
    responses(
        (status = 200, description = "Profile Updated", body = MessageResponse),
        (status = 400, description = "Data Missing", body = MessageResponse)
    ),
    tag = "Student"
)]
fn doc_update_profile() {}

#[utoipa::path(
    post,
    path = "/api/student/book-appointment",
    params(("token" = String, Header, description = "Student token")),
    request_body(
        content = BookAppointmentRequest,
        example = json!({"lecturerId": "5f0c...", "slotDate": "15_3_2025", "slotTime": "10:30 AM"})
    ),
    responses(
        (status = 200, description = "Consultation Appointment Booked", body = MessageResponse),
        (status = 404, description = "Lecturer not found", body = MessageResponse),
        (status = 409, description = "Lecturer Not Available / Slot Not Available", body = MessageResponse)
    ),
    tag = "Student"
)]
fn doc_book_appointment() {}

#[utoipa::path(
    get,
    path = "/api/student/appointments",
    params(("token" = String, Header, description = "Student token")),
    responses(
        (status = 200, description = "The student's appointments, oldest first", body = StudentAppointmentsResponse)
    ),
    tag = "Student"
)]
fn doc_list_appointments() {}

#[utoipa::path(
    post,
    path = "/api/student/cancel-appointment",
    params(("token" = String, Header, description = "Student token")),
    request_body = AppointmentIdRequest,
    responses(
        (status = 200, description = "Appointment Cancelled", body = MessageResponse),
        (status = 403, description = "Unauthorized action", body = MessageResponse),
        (status = 409, description = "The appointment is already completed", body = MessageResponse)
    ),
    tag = "Student"
)]
fn doc_cancel_appointment() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_register,
        doc_login,
        doc_get_profile,
        doc_update_profile,
        doc_book_appointment,
        doc_list_appointments,
        doc_cancel_appointment
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        TokenResponse,
        MessageResponse,
        UpdateProfileRequest,
        BookAppointmentRequest,
        AppointmentIdRequest,
        StudentProfileResponse,
        StudentAppointmentsResponse
    )),
    tags((name = "Student", description = "Student accounts and bookings"))
)]
pub struct StudentApiDoc;
