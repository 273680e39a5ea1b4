// Reschedule Sessions
//
// The state held while an appointment is being rescheduled.
// - PointerDrag: continuous pointer tracking, an invalid drop cancels
// - MoveSelected: discrete clicks, an invalid click is ignored

use std::fmt;

use chrono::{NaiveDate, NaiveTime};

use crate::models::appointment::{Appointment, AppointmentId, RoomId};
use crate::models::grid::CandidateSlot;
use crate::services::scheduling::ZoneType;

/// Which interaction mode owns a session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionKind {
    PointerDrag,
    MoveSelected,
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionKind::PointerDrag => write!(f, "pointer drag"),
            SessionKind::MoveSelected => write!(f, "click-to-move"),
        }
    }
}

/// Vertical direction of the last pointer movement during a drag
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DragDirection {
    Up,
    Down,
    #[default]
    Neutral,
}

/// An active reschedule of one appointment
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    /// Frozen copy taken when the session began
    pub snapshot: Appointment,
    pub candidate: Option<CandidateSlot>,
    pub zone: Option<ZoneType>,
    /// Distance in minutes between the appointment top and the grab point
    pub grab_offset_minutes: i32,
    pub direction: DragDirection,
    pub last_pointer_y: Option<f32>,
}

impl Session {
    pub fn new(appointment: &Appointment, grab_offset_minutes: i32) -> Self {
        Self {
            snapshot: appointment.clone(),
            candidate: None,
            zone: None,
            grab_offset_minutes,
            direction: DragDirection::Neutral,
            last_pointer_y: None,
        }
    }

    pub fn appointment_id(&self) -> &AppointmentId {
        &self.snapshot.id
    }

    /// True when `(date, time, room)` is where the appointment already sits
    pub fn is_origin(&self, date: NaiveDate, time: NaiveTime, room_id: &RoomId) -> bool {
        self.snapshot.is_at(date, time, room_id)
    }

    /// Record a pointer y and derive the movement direction from the previous one
    pub fn track_pointer(&mut self, y: f32) {
        if let Some(last) = self.last_pointer_y {
            self.direction = if y < last {
                DragDirection::Up
            } else if y > last {
                DragDirection::Down
            } else {
                self.direction
            };
        }
        self.last_pointer_y = Some(y);
    }

    pub fn set_candidate(&mut self, candidate: CandidateSlot, zone: ZoneType) {
        self.candidate = Some(candidate);
        self.zone = Some(zone);
    }
}

/// Tagged union of the interaction modes; at most one session exists
#[derive(Clone, Debug, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    PointerDragActive(Session),
    MoveSelected(Session),
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionState::Idle)
    }

    pub fn kind(&self) -> Option<SessionKind> {
        match self {
            InteractionState::Idle => None,
            InteractionState::PointerDragActive(_) => Some(SessionKind::PointerDrag),
            InteractionState::MoveSelected(_) => Some(SessionKind::MoveSelected),
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            InteractionState::Idle => None,
            InteractionState::PointerDragActive(session) | InteractionState::MoveSelected(session) => {
                Some(session)
            }
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        match self {
            InteractionState::Idle => None,
            InteractionState::PointerDragActive(session) | InteractionState::MoveSelected(session) => {
                Some(session)
            }
        }
    }

    /// End the current session, leaving the state idle
    pub fn take(&mut self) -> Option<(SessionKind, Session)> {
        match std::mem::take(self) {
            InteractionState::Idle => None,
            InteractionState::PointerDragActive(session) => Some((SessionKind::PointerDrag, session)),
            InteractionState::MoveSelected(session) => Some((SessionKind::MoveSelected, session)),
        }
    }
}
