// Appointment module
// Validated appointment value consumed by the scheduling grid

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::SchedulingError;
use crate::utils::date::{footprint_end, minutes_of_day, MINUTES_PER_DAY};

/// Identity of an appointment as assigned by the external store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppointmentId(pub String);

/// Identity of a bookable resource (treatment room / cabin)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

macro_rules! string_id {
    ($name:ident) => {
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(AppointmentId);
string_id!(RoomId);

/// A scheduled appointment occupying one room for a contiguous block of time.
///
/// The grid never mutates appointments; it only proposes a new
/// `(date, start_time, room_id)` triple for the external store to commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "AppointmentRecord")]
pub struct Appointment {
    pub id: AppointmentId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: u32,
    pub room_id: RoomId,
    /// Scoping only, pre-filtered by the caller
    pub clinic_id: Option<String>,
    /// Scoping only, pre-filtered by the caller
    pub tenant_id: Option<String>,
}

impl Appointment {
    /// Create a new appointment with required fields
    ///
    /// # Examples
    /// ```
    /// use clinic_agenda::models::appointment::Appointment;
    /// use chrono::{NaiveDate, NaiveTime};
    ///
    /// let apt = Appointment::new(
    ///     "A",
    ///     NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
    ///     NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
    ///     30,
    ///     "R1",
    /// )
    /// .unwrap();
    /// assert_eq!(apt.end_minutes(), 570);
    /// ```
    pub fn new(
        id: impl Into<AppointmentId>,
        date: NaiveDate,
        start_time: NaiveTime,
        duration_minutes: u32,
        room_id: impl Into<RoomId>,
    ) -> Result<Self, SchedulingError> {
        let appointment = Self {
            id: id.into(),
            date,
            start_time,
            duration_minutes,
            room_id: room_id.into(),
            clinic_id: None,
            tenant_id: None,
        };
        appointment.validate()?;
        Ok(appointment)
    }

    /// Create a builder for constructing appointments with optional fields
    pub fn builder() -> AppointmentBuilder {
        AppointmentBuilder::new()
    }

    /// Validate the appointment
    pub fn validate(&self) -> Result<(), SchedulingError> {
        if self.id.0.trim().is_empty() {
            return Err(SchedulingError::invalid("appointment id cannot be empty"));
        }
        if self.room_id.0.trim().is_empty() {
            return Err(SchedulingError::invalid("room id cannot be empty"));
        }
        if self.duration_minutes == 0 {
            return Err(SchedulingError::invalid(format!(
                "appointment {} must have a positive duration",
                self.id
            )));
        }
        if self.duration_minutes > MINUTES_PER_DAY as u32 {
            return Err(SchedulingError::invalid(format!(
                "appointment {} cannot last longer than a day ({} minutes)",
                self.id, self.duration_minutes
            )));
        }
        Ok(())
    }

    /// Start of the footprint in minutes since midnight
    pub fn start_minutes(&self) -> i32 {
        minutes_of_day(self.start_time)
    }

    /// Exclusive end of the footprint in minutes since midnight
    pub fn end_minutes(&self) -> i32 {
        footprint_end(self.start_minutes(), self.duration_minutes)
    }

    /// True when `minutes` lies inside `[start, start + duration)`
    pub fn covers(&self, minutes: i32) -> bool {
        minutes >= self.start_minutes() && minutes < self.end_minutes()
    }

    /// True when the appointment sits exactly at `(date, time, room)`
    pub fn is_at(&self, date: NaiveDate, time: NaiveTime, room_id: &RoomId) -> bool {
        self.date == date
            && minutes_of_day(self.start_time) == minutes_of_day(time)
            && &self.room_id == room_id
    }
}

/// Unvalidated wire shape of an appointment.
///
/// Deserialization goes through this record so that every `Appointment`
/// reaching the grid has passed `validate` exactly once.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRecord {
    pub id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    #[serde(alias = "duration")]
    pub duration_minutes: u32,
    #[serde(alias = "cabinId")]
    pub room_id: String,
    #[serde(default)]
    pub clinic_id: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
}

impl TryFrom<AppointmentRecord> for Appointment {
    type Error = SchedulingError;

    fn try_from(record: AppointmentRecord) -> Result<Self, Self::Error> {
        let appointment = Appointment {
            id: AppointmentId(record.id),
            date: record.date,
            start_time: record.start_time,
            duration_minutes: record.duration_minutes,
            room_id: RoomId(record.room_id),
            clinic_id: record.clinic_id,
            tenant_id: record.tenant_id,
        };
        appointment.validate()?;
        Ok(appointment)
    }
}

/// Builder for creating appointments with optional scoping fields
#[derive(Default)]
pub struct AppointmentBuilder {
    id: Option<AppointmentId>,
    date: Option<NaiveDate>,
    start_time: Option<NaiveTime>,
    duration_minutes: Option<u32>,
    room_id: Option<RoomId>,
    clinic_id: Option<String>,
    tenant_id: Option<String>,
}

impl AppointmentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<AppointmentId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn start_time(mut self, time: NaiveTime) -> Self {
        self.start_time = Some(time);
        self
    }

    pub fn duration_minutes(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    pub fn room(mut self, room_id: impl Into<RoomId>) -> Self {
        self.room_id = Some(room_id.into());
        self
    }

    pub fn clinic(mut self, clinic_id: impl Into<String>) -> Self {
        self.clinic_id = Some(clinic_id.into());
        self
    }

    pub fn tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    /// Build the appointment
    pub fn build(self) -> Result<Appointment, SchedulingError> {
        let missing = |field: &str| SchedulingError::invalid(format!("appointment {field} is required"));

        let appointment = Appointment {
            id: self.id.ok_or_else(|| missing("id"))?,
            date: self.date.ok_or_else(|| missing("date"))?,
            start_time: self.start_time.ok_or_else(|| missing("start time"))?,
            duration_minutes: self.duration_minutes.ok_or_else(|| missing("duration"))?,
            room_id: self.room_id.ok_or_else(|| missing("room"))?,
            clinic_id: self.clinic_id,
            tenant_id: self.tenant_id,
        };

        appointment.validate()?;
        Ok(appointment)
    }
}
