//! Persistence for the consultation backend
//!
//! Students, lecturers and appointments are stored through SQLx's `Any`
//! driver. SQLite is the default backend; PostgreSQL and MySQL can be
//! enabled through feature flags and selected by the URL scheme.
//!
//! # Example
//!
//! ```rust,no_run
//! use consult_config::DatabaseConfig;
//! use consult_db::Store;
//!
//! async fn setup() -> Result<Store, consult_db::DbError> {
//!     let config = DatabaseConfig {
//!         url: "sqlite://data/consultation.db".to_string(),
//!         max_connections: None,
//!     };
//!     let store = Store::connect(&config).await?;
//!     store.init_schema().await?;
//!     Ok(store)
//! }
//! ```

pub mod client;
pub mod error;
pub mod lifecycle;
pub mod repositories;
pub mod slots;
pub mod store;

pub use client::DbClient;
pub use error::DbError;
pub use lifecycle::{
    book_appointment, cancel_appointment, complete_appointment, Booking, Cancellation, Completion,
};
pub use repositories::{
    AppointmentRepository, LecturerProfileUpdate, LecturerRepository, SqlAppointmentRepository,
    SqlLecturerRepository, SqlStudentRepository, StudentProfileUpdate, StudentRepository,
};
pub use slots::{release_slot, reserve_slot, Reservation, MAX_SLOT_ATTEMPTS};
pub use store::Store;
