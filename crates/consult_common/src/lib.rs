// --- File: crates/consult_common/src/lib.rs ---

pub mod error; // Error handling
pub mod http; // HTTP envelopes and error responses
pub mod logging; // Logging setup
pub mod models; // Shared records
pub mod validation; // Request field checks

pub use error::{
    auth_error, conflict, forbidden, internal_error, not_found, validation_error, ConsultError,
    HttpStatusCode,
};

pub use http::{
    json_body, ok_message, ok_token, ApiResult, IntoHttpResponse, MessageResponse, TokenResponse,
    DB_UNAVAILABLE_MESSAGE,
};

pub use models::{
    now_millis, Address, AddressInput, Appointment, AppointmentStatus, Lecturer, PublicLecturer, SlotMap,
    SlotTaken, Student,
};

pub use validation::non_blank;
