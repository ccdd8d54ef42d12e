// --- File: crates/consult_lecturer/src/lib.rs ---

pub mod handlers; // Axum handlers and shared state
pub mod logic; // Lecturer accounts, appointments and dashboard
pub mod routes; // Router for /api/lecturer
#[cfg(feature = "openapi")]
pub mod doc; // OpenAPI description of the lecturer endpoints

pub use handlers::LecturerState;
pub use routes::routes;
