// --- File: crates/consult_lecturer/src/doc.rs ---

#![cfg(feature = "openapi")]
#![allow(dead_code)]

use consult_auth::LoginRequest;
use consult_common::{MessageResponse, TokenResponse};
use utoipa::OpenApi;

use crate::logic::{
    AppointmentIdRequest, DashboardData, DashboardResponse, LecturerAppointmentsResponse,
    LecturerListResponse, LecturerProfileResponse, LecturerRegisterRequest,
    UpdateLecturerProfileRequest,
};

#[utoipa::path(
    post,
    path = "/api/lecturer/register",
    request_body(
        content = LecturerRegisterRequest,
        example = json!({
            "name": "Grace Hopper",
            "email": "grace@uni.edu",
            "password": "cobol1959",
            "speciality": "Compilers"
        })
    ),
    responses(
        (status = 200, description = "Lecturer registered", body = TokenResponse),
        (status = 400, description = "Missing Details / invalid email / weak password", body = MessageResponse),
        (status = 409, description = "Lecturer already exists", body = MessageResponse)
    ),
    tag = "Lecturer"
)]
fn doc_register() {}

#[utoipa::path(
    post,
    path = "/api/lecturer/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = TokenResponse),
        (status = 401, description = "Invalid credentials", body = MessageResponse)
    ),
    tag = "Lecturer"
)]
fn doc_login() {}

#[utoipa::path(
    get,
    path = "/api/lecturer/list",
    responses((status = 200, description = "All lecturers without email", body = LecturerListResponse)),
    tag = "Lecturer"
)]
fn doc_list() {}

#[utoipa::path(
    get,
    path = "/api/lecturer/appointments",
    params(("ltoken" = String, Header, description = "Lecturer token (dtoken is accepted too)")),
    responses((status = 200, description = "The lecturer's appointments, oldest first", body = LecturerAppointmentsResponse)),
    tag = "Lecturer"
)]
fn doc_appointments() {}

#[utoipa::path(
    post,
    path = "/api/lecturer/cancel-appointment",
    params(("ltoken" = String, Header, description = "Lecturer token")),
    request_body = AppointmentIdRequest,
    responses(
        (status = 200, description = "Appointment Cancelled", body = MessageResponse),
        (status = 403, description = "Unauthorized action", body = MessageResponse),
        (status = 409, description = "The appointment is already completed", body = MessageResponse)
    ),
    tag = "Lecturer"
)]
fn doc_cancel_appointment() {}

#[utoipa::path(
    post,
    path = "/api/lecturer/complete-appointment",
    params(("ltoken" = String, Header, description = "Lecturer token")),
    request_body = AppointmentIdRequest,
    responses(
        (status = 200, description = "Appointment Completed", body = MessageResponse),
        (status = 403, description = "Unauthorized action", body = MessageResponse),
        (status = 409, description = "The appointment is already cancelled", body = MessageResponse)
    ),
    tag = "Lecturer"
)]
fn doc_complete_appointment() {}

#[utoipa::path(
    post,
    path = "/api/lecturer/change-availability",
    params(("ltoken" = String, Header, description = "Lecturer token")),
    responses((status = 200, description = "Availability Changed", body = MessageResponse)),
    tag = "Lecturer"
)]
fn doc_change_availability() {}

#[utoipa::path(
    get,
    path = "/api/lecturer/dashboard",
    params(("ltoken" = String, Header, description = "Lecturer token")),
    responses((status = 200, description = "Appointment and student counts", body = DashboardResponse)),
    tag = "Lecturer"
)]
fn doc_dashboard() {}

#[utoipa::path(
    get,
    path = "/api/lecturer/profile",
    params(("ltoken" = String, Header, description = "Lecturer token")),
    responses((status = 200, description = "The authenticated lecturer", body = LecturerProfileResponse)),
    tag = "Lecturer"
)]
fn doc_profile() {}

#[utoipa::path(
    post,
    path = "/api/lecturer/update-profile",
    params(("ltoken" = String, Header, description = "Lecturer token")),
    request_body(
        content = UpdateLecturerProfileRequest,
        example = json!({"address": {"line1": "Room 4.12", "line2": "CS Building"}, "available": false})
    ),
    responses((status = 200, description = "Profile Updated", body = MessageResponse)),
    tag = "Lecturer"
)]
fn doc_update_profile() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_register,
        doc_login,
        doc_list,
        doc_appointments,
        doc_cancel_appointment,
        doc_complete_appointment,
        doc_change_availability,
        doc_dashboard,
        doc_profile,
        doc_update_profile
    ),
    components(schemas(
        LecturerRegisterRequest,
        LoginRequest,
        TokenResponse,
        MessageResponse,
        AppointmentIdRequest,
        UpdateLecturerProfileRequest,
        LecturerAppointmentsResponse,
        LecturerListResponse,
        LecturerProfileResponse,
        DashboardData,
        DashboardResponse
    )),
    tags((name = "Lecturer", description = "Lecturer accounts, availability and appointments"))
)]
pub struct LecturerApiDoc;
