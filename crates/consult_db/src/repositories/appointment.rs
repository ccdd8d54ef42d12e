//! Repository for appointments

use crate::error::DbError;
use consult_common::Appointment;

/// Storage interface for appointments.
///
/// Lifecycle transitions are conditional writes: they only apply to an
/// appointment that is still active and report whether they did.
pub trait AppointmentRepository {
    fn init_schema(&self) -> impl std::future::Future<Output = Result<(), DbError>> + Send;

    fn create(
        &self,
        appointment: &Appointment,
    ) -> impl std::future::Future<Output = Result<(), DbError>> + Send;

    fn find_by_id(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Appointment>, DbError>> + Send;

    /// Appointments of a student, oldest booking first.
    fn find_by_student(
        &self,
        student_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Appointment>, DbError>> + Send;

    /// Appointments with a lecturer, oldest booking first.
    fn find_by_lecturer(
        &self,
        lecturer_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Appointment>, DbError>> + Send;

    /// Marks an active appointment as cancelled.
    ///
    /// Returns `false` if it was already cancelled or completed.
    fn mark_cancelled(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<bool, DbError>> + Send;

    /// Marks an active appointment as completed.
    ///
    /// Returns `false` if it was already cancelled or completed.
    fn mark_completed(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<bool, DbError>> + Send;
}
