// Error types
// Typed results returned by the scheduling core

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

use crate::models::appointment::{AppointmentId, RoomId};
use crate::ui_egui::drag::SessionKind;

/// Errors produced by the scheduling core.
///
/// None of these are thrown as control flow: the interaction state machine
/// inspects them and decides the next state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulingError {
    /// The candidate footprint overlaps another appointment
    #[error("{date} {time} in room {room_id} overlaps appointment {conflicting_id}")]
    ConflictRejected {
        date: NaiveDate,
        time: NaiveTime,
        room_id: RoomId,
        conflicting_id: AppointmentId,
    },

    /// Non-positive duration/granularity or malformed values handed to a pure function
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A second session was started while one is still active
    #[error("a {active} session for appointment {appointment_id} is already active")]
    SessionAlreadyActive {
        active: SessionKind,
        appointment_id: AppointmentId,
    },

    /// The candidate footprint leaves the configured business hours
    #[error("{time} for {duration_minutes} minutes falls outside business hours")]
    OutsideBusinessHours {
        time: NaiveTime,
        duration_minutes: u32,
    },

    /// The target cell is inactive or covered by a schedule override
    #[error("cell {date} {time} in room {room_id} is not available")]
    CellUnavailable {
        date: NaiveDate,
        time: NaiveTime,
        room_id: RoomId,
    },

    /// The move target is the appointment's current position
    #[error("appointment {0} is already at that position")]
    SamePosition(AppointmentId),

    /// A session operation was requested while idle
    #[error("no reschedule session is active")]
    NoActiveSession,
}

impl SchedulingError {
    pub fn invalid(message: impl Into<String>) -> Self {
        SchedulingError::InvalidInput(message.into())
    }

    /// True for errors caused by the surrounding integration rather than the user
    pub fn is_programmer_error(&self) -> bool {
        matches!(
            self,
            SchedulingError::InvalidInput(_)
                | SchedulingError::SessionAlreadyActive { .. }
                | SchedulingError::NoActiveSession
        )
    }
}
