//! Conflict detection between a candidate placement and existing appointments.

use chrono::{NaiveDate, NaiveTime};

use crate::error::SchedulingError;
use crate::models::appointment::{Appointment, AppointmentId, RoomId};
use crate::utils::date::{footprint_end, intervals_overlap, minutes_of_day};

/// Read-only provider of the appointments shown on a given day.
///
/// The list may be refreshed by its owner at any time; the scheduling core
/// re-reads it on every check and never caches it.
#[cfg_attr(test, mockall::automock)]
pub trait AppointmentSource {
    fn appointments_for_day(&self, date: NaiveDate) -> Vec<Appointment>;
}

impl AppointmentSource for Vec<Appointment> {
    fn appointments_for_day(&self, date: NaiveDate) -> Vec<Appointment> {
        self.iter().filter(|apt| apt.date == date).cloned().collect()
    }
}

impl AppointmentSource for [Appointment] {
    fn appointments_for_day(&self, date: NaiveDate) -> Vec<Appointment> {
        self.iter().filter(|apt| apt.date == date).cloned().collect()
    }
}

/// A tentative placement to test against the existing appointments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement<'a> {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub room_id: &'a RoomId,
    pub duration_minutes: u32,
}

impl<'a> Placement<'a> {
    pub fn new(date: NaiveDate, time: NaiveTime, room_id: &'a RoomId, duration_minutes: u32) -> Self {
        Self {
            date,
            time,
            room_id,
            duration_minutes,
        }
    }

    pub fn start_minutes(&self) -> i32 {
        minutes_of_day(self.time)
    }

    pub fn end_minutes(&self) -> i32 {
        footprint_end(self.start_minutes(), self.duration_minutes)
    }
}

/// First appointment whose footprint overlaps the placement.
///
/// Only appointments on the same date and room are considered, and the one
/// identified by `exclude` (the appointment being moved) never counts, even
/// if it still sits at its original slot in `existing`. Zero-length
/// footprints on either side never overlap, and touching boundaries
/// (`end == start`) are not an overlap.
pub fn find_conflict<'e>(
    placement: &Placement<'_>,
    existing: &'e [Appointment],
    exclude: Option<&AppointmentId>,
) -> Option<&'e Appointment> {
    if placement.duration_minutes == 0 {
        return None;
    }

    let start = placement.start_minutes();
    let end = placement.end_minutes();

    existing.iter().find(|apt| {
        apt.date == placement.date
            && &apt.room_id == placement.room_id
            && Some(&apt.id) != exclude
            && apt.duration_minutes > 0
            && intervals_overlap(start, end, apt.start_minutes(), apt.end_minutes())
    })
}

/// True when the placement overlaps an appointment other than `exclude`
pub fn has_conflict(
    placement: &Placement<'_>,
    existing: &[Appointment],
    exclude: Option<&AppointmentId>,
) -> bool {
    find_conflict(placement, existing, exclude).is_some()
}

/// Typed form of [`has_conflict`] used on commit paths
pub fn check_placement(
    placement: &Placement<'_>,
    existing: &[Appointment],
    exclude: Option<&AppointmentId>,
) -> Result<(), SchedulingError> {
    match find_conflict(placement, existing, exclude) {
        Some(apt) => Err(SchedulingError::ConflictRejected {
            date: placement.date,
            time: placement.time,
            room_id: placement.room_id.clone(),
            conflicting_id: apt.id.clone(),
        }),
        None => Ok(()),
    }
}

/// True when some existing appointment (other than `exclude`) covers the
/// instant `minutes` in `(date, room)`. Used for the idle hover indicator.
pub fn occupied_at(
    date: NaiveDate,
    room_id: &RoomId,
    minutes: i32,
    existing: &[Appointment],
    exclude: Option<&AppointmentId>,
) -> bool {
    existing.iter().any(|apt| {
        apt.date == date && &apt.room_id == room_id && Some(&apt.id) != exclude && apt.covers(minutes)
    })
}
