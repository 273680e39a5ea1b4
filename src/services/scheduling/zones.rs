//! Zone classification for drag feedback.
//!
//! Every candidate slot of an active session falls in exactly one zone:
//! sliding inside the moved appointment's own footprint (green, always legal),
//! the original time window in another room or day (blue, informational), a
//! free relocation elsewhere (green) or an occupied slot (blocked).

use serde::{Deserialize, Serialize};

use super::conflict::{has_conflict, Placement};
use crate::models::appointment::Appointment;
use crate::models::grid::CandidateSlot;

/// Visual category of a candidate slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneType {
    Blocked,
    Green,
    Blue,
}

impl ZoneType {
    /// Blocked slots cancel a drop; the others go on to final validation
    pub fn allows_drop(self) -> bool {
        self != ZoneType::Blocked
    }
}

/// Which classification rule matched, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneRule {
    /// Same date and room, start inside the original footprint
    Displacement,
    /// Inside the original time window but another date or room
    OriginWindow,
    /// Outside the original window and free of conflicts
    FreeRelocation,
    /// Another appointment occupies the candidate footprint
    Occupied,
}

impl ZoneRule {
    pub fn zone(self) -> ZoneType {
        match self {
            ZoneRule::Displacement | ZoneRule::FreeRelocation => ZoneType::Green,
            ZoneRule::OriginWindow => ZoneType::Blue,
            ZoneRule::Occupied => ZoneType::Blocked,
        }
    }
}

/// Classify `candidate` for the session moving `snapshot`.
///
/// `snapshot` is the frozen copy of the appointment taken when the session
/// began; `existing` is the live list for the candidate's day.
pub fn classify_rule(candidate: &CandidateSlot, snapshot: &Appointment, existing: &[Appointment]) -> ZoneRule {
    let in_origin_window = snapshot.covers(candidate.start_minutes());

    if in_origin_window && candidate.same_place(snapshot.date, &snapshot.room_id) {
        return ZoneRule::Displacement;
    }
    if in_origin_window {
        return ZoneRule::OriginWindow;
    }

    let placement = Placement::new(
        candidate.date,
        candidate.time,
        &candidate.room_id,
        snapshot.duration_minutes,
    );
    if has_conflict(&placement, existing, Some(&snapshot.id)) {
        ZoneRule::Occupied
    } else {
        ZoneRule::FreeRelocation
    }
}

/// Zone of `candidate` for the session moving `snapshot`
pub fn classify(candidate: &CandidateSlot, snapshot: &Appointment, existing: &[Appointment]) -> ZoneType {
    classify_rule(candidate, snapshot, existing).zone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::appointment::RoomId;
    use chrono::{NaiveDate, NaiveTime};

    fn june_10() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn appointment(id: &str, h: u32, m: u32, duration: u32, room: &str) -> Appointment {
        Appointment::new(id, june_10(), time(h, m), duration, room).unwrap()
    }

    fn candidate(h: u32, m: u32, room: &str) -> CandidateSlot {
        CandidateSlot {
            date: june_10(),
            time: time(h, m),
            room_id: RoomId::from(room),
            offset_minutes: 0,
        }
    }

    #[test]
    fn test_own_footprint_is_green_even_when_listed() {
        let a = appointment("A", 9, 0, 60, "R1");
        let existing = vec![a.clone()];
        for minute in [0, 15, 30, 45] {
            assert_eq!(
                classify_rule(&candidate(9, minute, "R1"), &a, &existing),
                ZoneRule::Displacement
            );
        }
    }

    #[test]
    fn test_own_footprint_is_green_even_when_displacement_overlaps_neighbour() {
        let a = appointment("A", 9, 0, 30, "R1");
        let b = appointment("B", 9, 30, 30, "R1");
        let existing = vec![a.clone(), b];
        assert_eq!(classify(&candidate(9, 15, "R1"), &a, &existing), ZoneType::Green);
    }

    #[test]
    fn test_origin_window_in_other_room_is_blue() {
        let a = appointment("A", 9, 0, 30, "R1");
        let busy = appointment("B", 9, 0, 30, "R2");
        let existing = vec![a.clone(), busy];
        assert_eq!(
            classify_rule(&candidate(9, 10, "R2"), &a, &existing),
            ZoneRule::OriginWindow
        );
        assert_eq!(classify(&candidate(9, 10, "R3"), &a, &existing), ZoneType::Blue);
    }

    #[test]
    fn test_origin_window_on_other_date_is_blue() {
        let a = appointment("A", 9, 0, 30, "R1");
        let mut slot = candidate(9, 0, "R1");
        slot.date = june_10().succ_opt().unwrap();
        assert_eq!(classify(&slot, &a, &[]), ZoneType::Blue);
    }

    #[test]
    fn test_free_relocation_is_green() {
        let a = appointment("A", 9, 0, 30, "R1");
        let existing = vec![a.clone(), appointment("B", 11, 0, 30, "R1")];
        assert_eq!(
            classify_rule(&candidate(10, 0, "R1"), &a, &existing),
            ZoneRule::FreeRelocation
        );
        // Ends exactly when B starts
        assert_eq!(classify(&candidate(10, 30, "R1"), &a, &existing), ZoneType::Green);
    }

    #[test]
    fn test_occupied_slot_is_blocked() {
        let a = appointment("A", 9, 0, 30, "R1");
        let existing = vec![a.clone(), appointment("B", 11, 0, 30, "R1")];
        assert_eq!(classify(&candidate(10, 45, "R1"), &a, &existing), ZoneType::Blocked);
        assert_eq!(classify(&candidate(11, 15, "R1"), &a, &existing), ZoneType::Blocked);
        assert!(!ZoneType::Blocked.allows_drop());
    }

    #[test]
    fn test_original_end_is_outside_window() {
        let a = appointment("A", 9, 0, 30, "R1");
        assert_eq!(
            classify_rule(&candidate(9, 30, "R1"), &a, &[a.clone()]),
            ZoneRule::FreeRelocation
        );
    }
}
