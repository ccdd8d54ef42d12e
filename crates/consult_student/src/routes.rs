use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use consult_auth::student_auth;
use std::sync::Arc;
use tracing::info;

use crate::handlers::{
    book_appointment_handler, cancel_appointment_handler, get_profile_handler,
    list_appointments_handler, login_handler, register_handler, update_profile_handler,
    StudentState,
};

/// Student routes, meant to be nested under `/api/student`.
///
/// `register` and `login` are public; every other route requires a student
/// token in the `token` header.
pub fn routes(state: Arc<StudentState>) -> Router {
    let protected = Router::new()
        .route("/get-profile", get(get_profile_handler))
        .route("/update-profile", post(update_profile_handler))
        .route("/book-appointment", post(book_appointment_handler))
        .route("/appointments", get(list_appointments_handler))
        .route("/cancel-appointment", post(cancel_appointment_handler))
        .route_layer(middleware::from_fn_with_state(
            state.keys.clone(),
            student_auth,
        ));

    info!("Student routes initialized");

    Router::new()
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
        .merge(protected)
        .with_state(state)
}
