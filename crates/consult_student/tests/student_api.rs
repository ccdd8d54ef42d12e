//! Student endpoints exercised in-process against a temp SQLite database.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use consult_auth::TokenKeys;
use consult_common::Lecturer;
use consult_config::{AppConfig, AuthConfig, DatabaseConfig};
use consult_db::{LecturerRepository, Store};
use consult_student::{routes, StudentState};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    _dir: TempDir,
    store: Store,
    router: Router,
}

fn test_config() -> Arc<AppConfig> {
    Arc::new(AppConfig {
        auth: AuthConfig {
            jwt_secret: "student-tests".to_string(),
            token_ttl_hours: 1,
            bcrypt_cost: 4,
        },
        ..AppConfig::default()
    })
}

fn state(store: Option<Store>) -> Arc<StudentState> {
    let config = test_config();
    Arc::new(StudentState {
        keys: Arc::new(TokenKeys::from_config(&config.auth)),
        config,
        store,
    })
}

async fn setup() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::connect(&DatabaseConfig {
        url: format!("sqlite://{}", dir.path().join("student.db").display()),
        max_connections: None,
    })
    .await
    .unwrap();
    store.init_schema().await.unwrap();

    let lecturer = Lecturer::new("l1".into(), "Grace".into(), "grace@uni.edu".into(), "x".into());
    store.lecturers.create(&lecturer).await.unwrap();

    TestApp {
        _dir: dir,
        router: routes(state(Some(store.clone()))),
        store,
    }
}

async fn send(router: &Router, method: &str, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("token", token);
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
        json!({"name": "Ada", "email": email, "password": "analytical"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn register_validates_and_rejects_duplicates() {
    let app = setup().await;

    let (status, body) = send(&app.router, "POST", "/register", None, json!({"name": "Ada"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing Details");

    let (_, body) = send(
        &app.router,
        "POST",
        "/register",
        None,
        json!({"name": "Ada", "email": "ada@uni.edu", "password": "short"}),
    )
    .await;
    assert_eq!(body["message"], "Please enter a strong password");

    register(&app.router, "ada@uni.edu").await;
    let (status, body) = send(
        &app.router,
        "POST",
        "/register",
        None,
        json!({"name": "Ada", "email": "ada@uni.edu", "password": "analytical"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Student already exists");
}

#[tokio::test]
async fn login_checks_credentials() {
    let app = setup().await;
    register(&app.router, "ada@uni.edu").await;

    let (status, body) = send(
        &app.router,
        "POST",
        "/login",
        None,
        json!({"email": "ada@uni.edu", "password": "analytical"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().is_some());

    let (status, body) = send(
        &app.router,
        "POST",
        "/login",
        None,
        json!({"email": "ada@uni.edu", "password": "wrong-password"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");

    let (_, body) = send(
        &app.router,
        "POST",
        "/login",
        None,
        json!({"email": "nobody@uni.edu", "password": "analytical"}),
    )
    .await;
    assert_eq!(body["message"], "Student does not exist");
}

#[tokio::test]
async fn profile_roundtrip() {
    let app = setup().await;
    let token = register(&app.router, "ada@uni.edu").await;

    let (status, body) = send(&app.router, "GET", "/get-profile", Some(&token), Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["studentData"]["email"], "ada@uni.edu");
    assert_eq!(body["studentData"]["dob"], "Not Selected");
    assert!(body["studentData"].get("password").is_none());

    let (status, body) = send(
        &app.router,
        "POST",
        "/update-profile",
        Some(&token),
        json!({"name": "Ada L", "phone": "0123456789", "dob": "1815-12-10", "gender": "Female",
               "address": "{\"line1\":\"1 Main St\",\"line2\":\"\"}"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Profile Updated");

    let (_, body) = send(&app.router, "GET", "/get-profile", Some(&token), Value::Null).await;
    assert_eq!(body["studentData"]["name"], "Ada L");
    assert_eq!(body["studentData"]["address"]["line1"], "1 Main St");

    let (status, body) = send(
        &app.router,
        "POST",
        "/update-profile",
        Some(&token),
        json!({"name": "Ada L", "phone": "0123456789"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Data Missing");
}

#[tokio::test]
async fn booking_and_cancelling() {
    let app = setup().await;
    let ada = register(&app.router, "ada@uni.edu").await;
    let bob = register(&app.router, "bob@uni.edu").await;
    let slot = json!({"lecturerId": "l1", "slotDate": "15_3_2025", "slotTime": "10:00 AM"});

    let (status, body) = send(&app.router, "POST", "/book-appointment", Some(&ada), slot.clone()).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Consultation Appointment Booked");

    let (status, body) = send(&app.router, "POST", "/book-appointment", Some(&bob), slot.clone()).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Slot Not Available");

    let (_, body) = send(&app.router, "GET", "/appointments", Some(&ada), Value::Null).await;
    let appointments = body["appointments"].as_array().unwrap();
    assert_eq!(appointments.len(), 1);
    assert_eq!(appointments[0]["lecturerData"]["name"], "Grace");
    let appointment_id = appointments[0]["_id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app.router,
        "POST",
        "/cancel-appointment",
        Some(&bob),
        json!({"appointmentId": appointment_id}),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Unauthorized action");

    let (status, body) = send(
        &app.router,
        "POST",
        "/cancel-appointment",
        Some(&ada),
        json!({"appointmentId": appointment_id}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Appointment Cancelled");

    let lecturer = app.store.lecturers.find_by_id("l1").await.unwrap().unwrap();
    assert!(lecturer.slots_booked.is_empty());

    let (status, _) = send(&app.router, "POST", "/book-appointment", Some(&bob), slot).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn unavailable_lecturer_cannot_be_booked() {
    let app = setup().await;
    let ada = register(&app.router, "ada@uni.edu").await;
    app.store.lecturers.toggle_available("l1").await.unwrap();

    let (status, body) = send(
        &app.router,
        "POST",
        "/book-appointment",
        Some(&ada),
        json!({"lecturerId": "l1", "slotDate": "15_3_2025", "slotTime": "10:00 AM"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Lecturer Not Available");

    let (_, body) = send(
        &app.router,
        "POST",
        "/book-appointment",
        Some(&ada),
        json!({"lecturerId": "l1", "slotDate": "15_3_2025"}),
    )
    .await;
    assert_eq!(body["message"], "Missing Details");
}

#[tokio::test]
async fn protected_routes_need_a_token() {
    let app = setup().await;

    let (status, body) = send(&app.router, "GET", "/appointments", None, Value::Null).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Not Authorized Login Again");

    let (status, body) = send(&app.router, "GET", "/appointments", Some("garbage"), Value::Null).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn without_database_endpoints_answer_503() {
    let router = routes(state(None));

    let (status, body) = send(
        &router,
        "POST",
        "/login",
        None,
        json!({"email": "ada@uni.edu", "password": "analytical"}),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["message"], "Database is disabled/not connected right now.");
}
