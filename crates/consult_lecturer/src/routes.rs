use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use consult_auth::lecturer_auth;
use std::sync::Arc;
use tracing::info;

use crate::handlers::{
    cancel_appointment_handler, change_availability_handler, complete_appointment_handler,
    dashboard_handler, list_appointments_handler, list_lecturers_handler, login_handler,
    profile_handler, register_handler, update_profile_handler, LecturerState,
};

/// Lecturer routes, meant to be nested under `/api/lecturer`.
///
/// `register`, `login` and `list` are public; the rest requires a lecturer
/// token in `ltoken` (or the older `dtoken`).
pub fn routes(state: Arc<LecturerState>) -> Router {
    let protected = Router::new()
        .route("/cancel-appointment", post(cancel_appointment_handler))
        .route("/appointments", get(list_appointments_handler))
        .route("/change-availability", post(change_availability_handler))
        .route("/complete-appointment", post(complete_appointment_handler))
        .route("/dashboard", get(dashboard_handler))
        .route("/profile", get(profile_handler))
        .route("/update-profile", post(update_profile_handler))
        .route_layer(middleware::from_fn_with_state(
            state.keys.clone(),
            lecturer_auth,
        ));

    info!("Lecturer routes initialized");

    Router::new()
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
        .route("/list", get(list_lecturers_handler))
        .merge(protected)
        .with_state(state)
}
