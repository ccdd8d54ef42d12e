//! Repository for students

use crate::error::DbError;
use consult_common::{Address, Student};

/// Fields a student can change on their own profile.
#[derive(Debug, Clone)]
pub struct StudentProfileUpdate {
    pub name: String,
    pub phone: String,
    /// `None` keeps the stored address.
    pub address: Option<Address>,
    pub dob: String,
    pub gender: String,
}

/// Storage interface for student records.
pub trait StudentRepository {
    /// Creates the `students` table if it does not exist.
    fn init_schema(&self) -> impl std::future::Future<Output = Result<(), DbError>> + Send;

    /// Inserts a new student. A taken email yields [`DbError::Duplicate`].
    fn create(
        &self,
        student: &Student,
    ) -> impl std::future::Future<Output = Result<(), DbError>> + Send;

    fn find_by_id(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Student>, DbError>> + Send;

    fn find_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<Student>, DbError>> + Send;

    /// Applies a profile update. Returns `false` when no such student exists.
    fn update_profile(
        &self,
        id: &str,
        update: &StudentProfileUpdate,
    ) -> impl std::future::Future<Output = Result<bool, DbError>> + Send;
}
