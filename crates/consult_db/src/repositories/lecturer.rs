//! Repository for lecturers

use crate::error::DbError;
use consult_common::{Address, Lecturer, SlotMap};

/// Profile fields a lecturer can change; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct LecturerProfileUpdate {
    pub address: Option<Address>,
    pub available: Option<bool>,
    pub speciality: Option<String>,
    pub degree: Option<String>,
    pub experience: Option<String>,
    pub about: Option<String>,
}

/// Storage interface for lecturer records.
pub trait LecturerRepository {
    /// Creates the `lecturers` table if it does not exist.
    fn init_schema(&self) -> impl std::future::Future<Output = Result<(), DbError>> + Send;

    /// Inserts a new lecturer. A taken email yields [`DbError::Duplicate`].
    fn create(
        &self,
        lecturer: &Lecturer,
    ) -> impl std::future::Future<Output = Result<(), DbError>> + Send;

    fn find_by_id(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Lecturer>, DbError>> + Send;

    fn find_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<Lecturer>, DbError>> + Send;

    /// All lecturers in registration order.
    fn find_all(&self) -> impl std::future::Future<Output = Result<Vec<Lecturer>, DbError>> + Send;

    /// Flips the `available` flag. Returns `false` when no such lecturer exists.
    fn toggle_available(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<bool, DbError>> + Send;

    /// Writes only the fields present in `update`, in a single statement.
    /// Returns `false` when no such lecturer exists.
    fn update_profile(
        &self,
        id: &str,
        update: &LecturerProfileUpdate,
    ) -> impl std::future::Future<Output = Result<bool, DbError>> + Send;

    /// Replaces the slot map only if the stored one still equals `expected`.
    ///
    /// Returns `false` when another writer changed the slot map in between
    /// (or the lecturer no longer exists).
    fn replace_slots(
        &self,
        id: &str,
        expected: &SlotMap,
        new: &SlotMap,
    ) -> impl std::future::Future<Output = Result<bool, DbError>> + Send;
}
