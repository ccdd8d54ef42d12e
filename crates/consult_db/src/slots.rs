//! Booking and freeing lecturer slots
//!
//! A lecturer's slot map is read, changed in memory and written back with a
//! compare-and-swap on the stored value. When another request changed the map
//! in between, the cycle starts over from a fresh read. A retry only gives
//! up early when the fresh read shows the requested time itself was taken,
//! so bookings of different times on one lecturer all go through.

use crate::error::DbError;
use crate::repositories::LecturerRepository;
use consult_common::Lecturer;
use std::time::Duration;
use tracing::{debug, warn};

/// Read-modify-write attempts before giving up with [`DbError::Contention`].
///
/// Every lost swap means another write to the same slot map succeeded, so
/// this also bounds how many concurrent writers one lecturer can absorb.
pub const MAX_SLOT_ATTEMPTS: usize = 16;

/// Pause after the given lost swap, growing with each attempt.
fn backoff(attempt: usize) -> Duration {
    Duration::from_millis(2 * attempt as u64)
}

/// Result of trying to book a slot.
#[derive(Debug, Clone)]
pub enum Reservation {
    /// The slot is now booked; carries the lecturer with the updated slot map.
    Reserved(Lecturer),
    /// The lecturer is not taking bookings.
    NotAvailable,
    /// Someone else already holds this date and time.
    Taken,
    UnknownLecturer,
}

/// Books `time` on `date` for the lecturer.
pub async fn reserve_slot<R>(
    lecturers: &R,
    lecturer_id: &str,
    date: &str,
    time: &str,
) -> Result<Reservation, DbError>
where
    R: LecturerRepository + Sync,
{
    for attempt in 1..=MAX_SLOT_ATTEMPTS {
        let Some(mut lecturer) = lecturers.find_by_id(lecturer_id).await? else {
            return Ok(Reservation::UnknownLecturer);
        };
        if !lecturer.available {
            return Ok(Reservation::NotAvailable);
        }

        let expected = lecturer.slots_booked.clone();
        if lecturer.slots_booked.reserve(date, time).is_err() {
            return Ok(Reservation::Taken);
        }

        if lecturers
            .replace_slots(lecturer_id, &expected, &lecturer.slots_booked)
            .await?
        {
            debug!("Reserved {} {} for lecturer {}", date, time, lecturer_id);
            return Ok(Reservation::Reserved(lecturer));
        }
        warn!(
            "Slot map of lecturer {} changed during reservation (attempt {}/{})",
            lecturer_id, attempt, MAX_SLOT_ATTEMPTS
        );
        tokio::time::sleep(backoff(attempt)).await;
    }

    Err(DbError::Contention(format!("lecturer {lecturer_id}")))
}

/// Frees `time` on `date` for the lecturer.
///
/// Returns `false` when the lecturer does not exist or the time was not booked.
pub async fn release_slot<R>(
    lecturers: &R,
    lecturer_id: &str,
    date: &str,
    time: &str,
) -> Result<bool, DbError>
where
    R: LecturerRepository + Sync,
{
    for attempt in 1..=MAX_SLOT_ATTEMPTS {
        let Some(mut lecturer) = lecturers.find_by_id(lecturer_id).await? else {
            return Ok(false);
        };

        let expected = lecturer.slots_booked.clone();
        if !lecturer.slots_booked.release(date, time) {
            return Ok(false);
        }

        if lecturers
            .replace_slots(lecturer_id, &expected, &lecturer.slots_booked)
            .await?
        {
            debug!("Released {} {} for lecturer {}", date, time, lecturer_id);
            return Ok(true);
        }
        warn!(
            "Slot map of lecturer {} changed during release (attempt {}/{})",
            lecturer_id, attempt, MAX_SLOT_ATTEMPTS
        );
        tokio::time::sleep(backoff(attempt)).await;
    }

    Err(DbError::Contention(format!("lecturer {lecturer_id}")))
}
