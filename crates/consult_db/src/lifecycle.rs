//! Appointment lifecycle
//!
//! Booking reserves the slot first and only then stores the appointment, so
//! two students can never hold the same slot. Cancelling releases the slot
//! exactly once; completing leaves the slot map alone.

use crate::error::DbError;
use crate::repositories::AppointmentRepository;
use crate::slots::{release_slot, reserve_slot, Reservation};
use crate::store::Store;
use consult_common::{now_millis, Appointment, AppointmentStatus, Student};
use tracing::{error, info, warn};
use uuid::Uuid;

/// Result of a booking attempt.
#[derive(Debug, Clone)]
pub enum Booking {
    Booked(Appointment),
    LecturerNotAvailable,
    SlotTaken,
    UnknownLecturer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cancellation {
    Cancelled,
    /// Already cancelled earlier; nothing changed.
    AlreadyCancelled,
    AlreadyCompleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Completed,
    /// Already completed earlier; nothing changed.
    AlreadyCompleted,
    AlreadyCancelled,
}

/// Books `time` on `date` with the lecturer for `student`.
pub async fn book_appointment(
    store: &Store,
    student: &Student,
    lecturer_id: &str,
    date: &str,
    time: &str,
) -> Result<Booking, DbError> {
    let lecturer = match reserve_slot(&store.lecturers, lecturer_id, date, time).await? {
        Reservation::Reserved(lecturer) => lecturer,
        Reservation::NotAvailable => return Ok(Booking::LecturerNotAvailable),
        Reservation::Taken => return Ok(Booking::SlotTaken),
        Reservation::UnknownLecturer => return Ok(Booking::UnknownLecturer),
    };

    let appointment = Appointment {
        id: Uuid::new_v4().to_string(),
        student_id: student.id.clone(),
        lecturer_id: lecturer.id.clone(),
        slot_date: date.to_string(),
        slot_time: time.to_string(),
        student_data: student.snapshot()?,
        lecturer_data: lecturer.snapshot()?,
        date: now_millis(),
        cancelled: false,
        is_completed: false,
    };

    if let Err(e) = store.appointments.create(&appointment).await {
        error!(
            "Storing appointment failed, releasing {} {} of lecturer {}: {}",
            date, time, lecturer_id, e
        );
        if let Err(release_err) = release_slot(&store.lecturers, lecturer_id, date, time).await {
            error!("Releasing slot after failed booking failed: {}", release_err);
        }
        return Err(e);
    }

    info!(
        "Appointment {} booked: student {} with lecturer {} at {} {}",
        appointment.id, student.id, lecturer_id, date, time
    );
    Ok(Booking::Booked(appointment))
}

/// Cancels an appointment and frees its slot.
///
/// The slot is released only by the request whose write flipped the flag.
pub async fn cancel_appointment(
    store: &Store,
    appointment: &Appointment,
) -> Result<Cancellation, DbError> {
    match appointment.status() {
        AppointmentStatus::Cancelled => return Ok(Cancellation::AlreadyCancelled),
        AppointmentStatus::Completed => return Ok(Cancellation::AlreadyCompleted),
        AppointmentStatus::Active => {}
    }

    if !store.appointments.mark_cancelled(&appointment.id).await? {
        // Lost a race with another transition; report what won.
        return Ok(match current_status(store, &appointment.id).await? {
            AppointmentStatus::Completed => Cancellation::AlreadyCompleted,
            _ => Cancellation::AlreadyCancelled,
        });
    }

    let released = release_slot(
        &store.lecturers,
        &appointment.lecturer_id,
        &appointment.slot_date,
        &appointment.slot_time,
    )
    .await?;
    if !released {
        warn!(
            "Appointment {} cancelled but its slot {} {} was not booked",
            appointment.id, appointment.slot_date, appointment.slot_time
        );
    }

    info!("Appointment {} cancelled", appointment.id);
    Ok(Cancellation::Cancelled)
}

/// Marks an appointment as completed.
pub async fn complete_appointment(
    store: &Store,
    appointment: &Appointment,
) -> Result<Completion, DbError> {
    match appointment.status() {
        AppointmentStatus::Cancelled => return Ok(Completion::AlreadyCancelled),
        AppointmentStatus::Completed => return Ok(Completion::AlreadyCompleted),
        AppointmentStatus::Active => {}
    }

    if !store.appointments.mark_completed(&appointment.id).await? {
        return Ok(match current_status(store, &appointment.id).await? {
            AppointmentStatus::Cancelled => Completion::AlreadyCancelled,
            _ => Completion::AlreadyCompleted,
        });
    }

    info!("Appointment {} completed", appointment.id);
    Ok(Completion::Completed)
}

async fn current_status(store: &Store, id: &str) -> Result<AppointmentStatus, DbError> {
    store
        .appointments
        .find_by_id(id)
        .await?
        .map(|a| a.status())
        .ok_or_else(|| DbError::QueryError(format!("appointment {id} disappeared")))
}
