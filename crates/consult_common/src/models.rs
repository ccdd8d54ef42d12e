// --- File: crates/consult_common/src/models.rs ---

// Records shared by the student and lecturer services and by the database crate.
// JSON names follow the wire format the web clients already speak
// (`_id`, camelCase appointment fields, `slots_booked`).

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Current time as epoch milliseconds, the unit used for record timestamps.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn default_phone() -> String {
    "0000000000".to_string()
}

fn not_selected() -> String {
    "Not Selected".to_string()
}

fn default_true() -> bool {
    true
}

/// Postal address, stored and sent as a nested object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Address {
    #[serde(default)]
    pub line1: String,
    #[serde(default)]
    pub line2: String,
}

/// Address as sent in update requests: an object, or the same object
/// JSON-encoded in a string (older form-data clients).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AddressInput {
    Object(Address),
    Encoded(String),
}

impl AddressInput {
    pub fn into_address(self) -> Result<Address, serde_json::Error> {
        match self {
            AddressInput::Object(address) => Ok(address),
            AddressInput::Encoded(raw) => serde_json::from_str(&raw),
        }
    }
}

/// Returned by [`SlotMap::reserve`] when the time is already booked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("slot {time} on {date} is already booked")]
pub struct SlotTaken {
    pub date: String,
    pub time: String,
}

/// Booked times of a lecturer, keyed by slot date.
///
/// Dates and times are opaque strings chosen by the client
/// (e.g. `"15_3_2025"` and `"10:30 AM"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(transparent)]
pub struct SlotMap(BTreeMap<String, Vec<String>>);

impl SlotMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_booked(&self, date: &str, time: &str) -> bool {
        self.0
            .get(date)
            .is_some_and(|times| times.iter().any(|t| t == time))
    }

    /// Books `time` on `date`, failing if it is already taken.
    pub fn reserve(&mut self, date: &str, time: &str) -> Result<(), SlotTaken> {
        if self.is_booked(date, time) {
            return Err(SlotTaken {
                date: date.to_string(),
                time: time.to_string(),
            });
        }
        self.0
            .entry(date.to_string())
            .or_default()
            .push(time.to_string());
        Ok(())
    }

    /// Frees `time` on `date`. Returns whether the time was booked.
    ///
    /// A date left without booked times is removed.
    pub fn release(&mut self, date: &str, time: &str) -> bool {
        let Some(times) = self.0.get_mut(date) else {
            return false;
        };
        let before = times.len();
        times.retain(|t| t != time);
        let removed = times.len() != before;
        if times.is_empty() {
            self.0.remove(date);
        }
        removed
    }

    pub fn times_for(&self, date: &str) -> &[String] {
        self.0.get(date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A registered student.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Student {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    /// bcrypt hash; never part of a response.
    #[serde(skip_serializing, default)]
    pub password: String,
    #[serde(default)]
    pub image: String,
    #[serde(default = "default_phone")]
    pub phone: String,
    #[serde(default)]
    pub address: Address,
    #[serde(default = "not_selected")]
    pub gender: String,
    #[serde(default = "not_selected")]
    pub dob: String,
}

impl Student {
    pub fn new(id: String, name: String, email: String, password_hash: String) -> Self {
        Self {
            id,
            name,
            email,
            password: password_hash,
            image: String::new(),
            phone: default_phone(),
            address: Address::default(),
            gender: not_selected(),
            dob: not_selected(),
        }
    }

    /// Copy of the public profile stored on an appointment at booking time.
    pub fn snapshot(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// A registered lecturer, including the slot map of booked times.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Lecturer {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub speciality: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub about: String,
    #[serde(default = "default_true")]
    pub available: bool,
    #[serde(default)]
    pub slots_booked: SlotMap,
    #[serde(default)]
    pub address: Address,
    /// Registration time, epoch milliseconds.
    pub date: i64,
}

impl Lecturer {
    pub fn new(id: String, name: String, email: String, password_hash: String) -> Self {
        Self {
            id,
            name,
            email,
            password: password_hash,
            image: String::new(),
            speciality: String::new(),
            degree: String::new(),
            experience: String::new(),
            about: String::new(),
            available: true,
            slots_booked: SlotMap::new(),
            address: Address::default(),
            date: now_millis(),
        }
    }

    /// Copy of the public profile stored on an appointment, without the slot map.
    pub fn snapshot(&self) -> Result<Value, serde_json::Error> {
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(map) = &mut value {
            map.remove("slots_booked");
        }
        Ok(value)
    }
}

/// Lecturer as shown in the public listing: no email, no password.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PublicLecturer {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub image: String,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub available: bool,
    pub slots_booked: SlotMap,
    pub address: Address,
    pub date: i64,
}

impl From<Lecturer> for PublicLecturer {
    fn from(l: Lecturer) -> Self {
        Self {
            id: l.id,
            name: l.name,
            image: l.image,
            speciality: l.speciality,
            degree: l.degree,
            experience: l.experience,
            about: l.about,
            available: l.available,
            slots_booked: l.slots_booked,
            address: l.address,
            date: l.date,
        }
    }
}

/// Where an appointment is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentStatus {
    Active,
    Cancelled,
    Completed,
}

/// A booked consultation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(rename = "_id")]
    pub id: String,
    pub student_id: String,
    pub lecturer_id: String,
    pub slot_date: String,
    pub slot_time: String,
    /// Student profile at booking time.
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub student_data: Value,
    /// Lecturer profile at booking time.
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub lecturer_data: Value,
    /// Booking time, epoch milliseconds.
    pub date: i64,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default)]
    pub is_completed: bool,
}

impl Appointment {
    pub fn status(&self) -> AppointmentStatus {
        if self.cancelled {
            AppointmentStatus::Cancelled
        } else if self.is_completed {
            AppointmentStatus::Completed
        } else {
            AppointmentStatus::Active
        }
    }
}
