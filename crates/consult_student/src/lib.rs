// --- File: crates/consult_student/src/lib.rs ---

pub mod handlers; // Axum handlers and shared state
pub mod logic; // Registration, profile and booking rules
pub mod routes; // Router for /api/student
#[cfg(feature = "openapi")]
pub mod doc; // OpenAPI description of the student endpoints

pub use handlers::StudentState;
pub use routes::routes;
