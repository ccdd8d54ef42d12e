//! Lecturer endpoints exercised in-process against a temp SQLite database.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use consult_auth::TokenKeys;
use consult_common::Student;
use consult_config::{AppConfig, AuthConfig, DatabaseConfig};
use consult_db::{book_appointment, Booking, LecturerRepository, Store};
use consult_lecturer::{routes, LecturerState};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    _dir: TempDir,
    store: Store,
    router: Router,
}

async fn setup() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::connect(&DatabaseConfig {
        url: format!("sqlite://{}", dir.path().join("lecturer.db").display()),
        max_connections: None,
    })
    .await
    .unwrap();
    store.init_schema().await.unwrap();

    let config = Arc::new(AppConfig {
        auth: AuthConfig {
            jwt_secret: "lecturer-tests".to_string(),
            token_ttl_hours: 1,
            bcrypt_cost: 4,
        },
        ..AppConfig::default()
    });
    let state = Arc::new(LecturerState {
        keys: Arc::new(TokenKeys::from_config(&config.auth)),
        config,
        store: Some(store.clone()),
    });

    TestApp {
        _dir: dir,
        router: routes(state),
        store,
    }
}

async fn send(router: &Router, method: &str, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("ltoken", token);
    }
    let response = router
        .clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn register(router: &Router, email: &str) -> String {
    let (status, body) = send(
        router,
        "POST",
        "/register",
        None,
        json!({"name": "Grace", "email": email, "password": "cobol1959", "speciality": "Compilers"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["token"].as_str().unwrap().to_string()
}

async fn lecturer_id(store: &Store, email: &str) -> String {
    store.lecturers.find_by_email(email).await.unwrap().unwrap().id
}

async fn book(store: &Store, student_id: &str, lecturer_id: &str, time: &str) -> String {
    // Bookings are ordered by their millisecond timestamp.
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let student = Student::new(student_id.into(), "Ada".into(), format!("{student_id}@uni.edu"), "x".into());
    match book_appointment(store, &student, lecturer_id, "15_3_2025", time).await.unwrap() {
        Booking::Booked(appointment) => appointment.id,
        other => panic!("unexpected booking outcome: {other:?}"),
    }
}

#[tokio::test]
async fn register_login_and_list() {
    let app = setup().await;
    register(&app.router, "grace@uni.edu").await;

    let (status, body) = send(
        &app.router,
        "POST",
        "/register",
        None,
        json!({"name": "Grace", "email": "grace@uni.edu", "password": "cobol1959"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Lecturer already exists");

    let (status, body) = send(
        &app.router,
        "POST",
        "/login",
        None,
        json!({"email": "nobody@uni.edu", "password": "cobol1959"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");

    let (status, body) = send(&app.router, "GET", "/list", None, Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    let lecturers = body["lecturers"].as_array().unwrap();
    assert_eq!(lecturers.len(), 1);
    assert_eq!(lecturers[0]["speciality"], "Compilers");
    assert!(lecturers[0].get("email").is_none());
    assert!(lecturers[0].get("password").is_none());
}

#[tokio::test]
async fn availability_and_profile() {
    let app = setup().await;
    let token = register(&app.router, "grace@uni.edu").await;

    let (status, body) = send(&app.router, "POST", "/change-availability", Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Availability Changed");

    let (_, body) = send(&app.router, "GET", "/profile", Some(&token), Value::Null).await;
    assert_eq!(body["profileData"]["available"], false);
    assert_eq!(body["profileData"]["email"], "grace@uni.edu");

    let (status, _) = send(&app.router, "POST", "/update-profile", Some(&token), json!({"degree": "PhD"})).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app.router, "GET", "/profile", Some(&token), Value::Null).await;
    assert_eq!(body["profileData"]["available"], false);
    assert_eq!(body["profileData"]["degree"], "PhD");

    let (status, _) = send(
        &app.router,
        "POST",
        "/update-profile",
        Some(&token),
        json!({"address": {"line1": "Room 4.12", "line2": "CS"}, "available": true, "about": "Navy"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app.router, "GET", "/profile", Some(&token), Value::Null).await;
    assert_eq!(body["profileData"]["available"], true);
    assert_eq!(body["profileData"]["address"]["line1"], "Room 4.12");
    assert_eq!(body["profileData"]["about"], "Navy");
    assert_eq!(body["profileData"]["speciality"], "Compilers");
}

#[tokio::test]
async fn legacy_dtoken_header_is_accepted() {
    let app = setup().await;
    let token = register(&app.router, "grace@uni.edu").await;

    let request = Request::builder()
        .uri("/dashboard")
        .header("dtoken", token)
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn appointments_lifecycle_and_dashboard() {
    let app = setup().await;
    let token = register(&app.router, "grace@uni.edu").await;
    let other = register(&app.router, "alan@uni.edu").await;
    let id = lecturer_id(&app.store, "grace@uni.edu").await;

    let first = book(&app.store, "s1", &id, "09:00 AM").await;
    let second = book(&app.store, "s2", &id, "10:00 AM").await;
    book(&app.store, "s1", &id, "11:00 AM").await;

    let (_, body) = send(&app.router, "GET", "/dashboard", Some(&token), Value::Null).await;
    assert_eq!(body["dashData"]["appointments"], 3);
    assert_eq!(body["dashData"]["students"], 2);
    assert_eq!(body["dashData"]["latestAppointments"][0]["slotTime"], "11:00 AM");

    let (status, body) = send(
        &app.router,
        "POST",
        "/complete-appointment",
        Some(&other),
        json!({"appointmentId": first}),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Unauthorized action");

    let (_, body) = send(
        &app.router,
        "POST",
        "/complete-appointment",
        Some(&token),
        json!({"appointmentId": first}),
    )
    .await;
    assert_eq!(body["message"], "Appointment Completed");

    let (status, _) = send(
        &app.router,
        "POST",
        "/cancel-appointment",
        Some(&token),
        json!({"appointmentId": first}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(
        &app.router,
        "POST",
        "/cancel-appointment",
        Some(&token),
        json!({"appointmentId": second}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Appointment Cancelled");

    let lecturer = app.store.lecturers.find_by_id(&id).await.unwrap().unwrap();
    assert!(!lecturer.slots_booked.is_booked("15_3_2025", "10:00 AM"));
    assert!(lecturer.slots_booked.is_booked("15_3_2025", "09:00 AM"));

    let (status, body) = send(
        &app.router,
        "POST",
        "/complete-appointment",
        Some(&token),
        json!({"appointmentId": second}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Cancelled appointments cannot be completed");

    let (_, body) = send(&app.router, "GET", "/appointments", Some(&token), Value::Null).await;
    let appointments = body["appointments"].as_array().unwrap();
    assert_eq!(appointments.len(), 3);
    assert_eq!(appointments[0]["isCompleted"], true);
    assert_eq!(appointments[1]["cancelled"], true);
}

#[tokio::test]
async fn student_token_is_rejected() {
    let app = setup().await;
    let keys = TokenKeys::new(b"lecturer-tests", 1);
    let student_token = keys.issue("s1", consult_auth::Role::Student).unwrap();

    let (status, body) = send(&app.router, "GET", "/profile", Some(&student_token), Value::Null).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");
}
