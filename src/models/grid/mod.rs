// Grid module
// Addressable cells and the ephemeral candidate slot of a reschedule session

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::appointment::RoomId;
use crate::utils::date::minutes_of_day;

/// The `(date, time, room)` unit of the grid. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellCoordinate {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub room_id: RoomId,
}

impl CellCoordinate {
    pub fn new(date: NaiveDate, time: NaiveTime, room_id: impl Into<RoomId>) -> Self {
        Self {
            date,
            time,
            room_id: room_id.into(),
        }
    }

    pub fn start_minutes(&self) -> i32 {
        minutes_of_day(self.time)
    }
}

/// Whether a cell accepts hover feedback and drops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellAvailability {
    #[default]
    Available,
    /// Closed day or slot outside the room's schedule
    Inactive,
    /// Covered by a schedule override (room blocked)
    Overridden,
}

impl CellAvailability {
    pub fn accepts_drop(self) -> bool {
        self == CellAvailability::Available
    }
}

/// Tentative target of an active reschedule session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSlot {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub room_id: RoomId,
    /// Minutes from the start of the cell the pointer is over. Negative or
    /// beyond the slot duration while dragging into neighbouring cells.
    pub offset_minutes: i32,
}

impl CandidateSlot {
    pub fn start_minutes(&self) -> i32 {
        minutes_of_day(self.time)
    }

    pub fn same_place(&self, date: NaiveDate, room_id: &RoomId) -> bool {
        self.date == date && &self.room_id == room_id
    }
}
