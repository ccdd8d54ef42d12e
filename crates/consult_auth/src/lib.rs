// --- File: crates/consult_auth/src/lib.rs ---

pub mod credentials; // Register and login payloads
pub mod error; // Authentication failures
pub mod middleware; // Role token middlewares
pub mod password; // bcrypt and credential checks
pub mod token; // Signed role tokens

pub use credentials::{LoginRequest, NewAccount, RegisterRequest};
pub use error::AuthError;
pub use middleware::{
    lecturer_auth, student_auth, AuthenticatedUser, LECTURER_TOKEN_HEADER,
    LEGACY_LECTURER_TOKEN_HEADER, STUDENT_TOKEN_HEADER,
};
pub use password::{hash_password, is_strong_password, is_valid_email, verify_password};
pub use token::{Claims, Role, TokenKeys};
