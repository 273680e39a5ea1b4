//! Events crossing the boundary between the grid and its host.
//!
//! Inbound: pointer positions resolved to a cell by the rendering layer.
//! Outbound: [`GridEventSink`] callbacks for feedback, commits and cancellations.

use chrono::{NaiveDate, NaiveTime};
use egui::{Pos2, Rect};
use serde::{Deserialize, Serialize};

use crate::models::appointment::{AppointmentId, RoomId};
use crate::models::grid::{CellAvailability, CellCoordinate};
use crate::services::scheduling::ZoneType;

/// The cell under the pointer, as laid out on screen
#[derive(Clone, Debug, PartialEq)]
pub struct CellTarget {
    pub cell: CellCoordinate,
    pub rect: Rect,
    pub availability: CellAvailability,
}

/// A pointer position with the cell it falls in, if any
#[derive(Clone, Debug, PartialEq)]
pub struct PointerEvent {
    pub pos: Pos2,
    pub target: Option<CellTarget>,
}

impl PointerEvent {
    pub fn new(pos: Pos2, target: Option<CellTarget>) -> Self {
        Self { pos, target }
    }

    pub fn outside(pos: Pos2) -> Self {
        Self { pos, target: None }
    }

    /// Pixels below the target cell's top edge. Positions in the extended
    /// hit region above the cell count as its top edge.
    pub fn offset_px(&self) -> Option<f32> {
        self.target
            .as_ref()
            .map(|target| (self.pos.y - target.rect.top()).max(0.0))
    }
}

/// Feedback for the slot currently under consideration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidatePreview {
    pub date: NaiveDate,
    pub room_id: RoomId,
    pub time: NaiveTime,
    pub zone: ZoneType,
    /// Pixels from the hovered cell's top edge to the candidate line
    pub pixel_offset: f32,
}

/// The single instruction emitted when a session commits
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveCommit {
    pub appointment_id: AppointmentId,
    pub new_date: NaiveDate,
    pub new_time: NaiveTime,
    pub new_room_id: RoomId,
}

/// Receiver of everything the grid reports to its host
#[cfg_attr(test, mockall::automock)]
pub trait GridEventSink {
    /// Fires at most once per distinct preview key
    fn on_candidate_changed(&mut self, preview: &CandidatePreview);
    fn on_preview_cleared(&mut self);
    /// Fires exactly once per committed session
    fn on_commit(&mut self, commit: &MoveCommit);
    fn on_session_cancelled(&mut self, appointment_id: &AppointmentId);
}

/// Recorded sink callback
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GridEvent {
    CandidateChanged(CandidatePreview),
    PreviewCleared,
    Committed(MoveCommit),
    #[serde(rename_all = "camelCase")]
    Cancelled { appointment_id: AppointmentId },
}

/// Sink that keeps every callback in order
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<GridEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[GridEvent] {
        &self.events
    }

    /// Drain the recorded events
    pub fn take(&mut self) -> Vec<GridEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn commits(&self) -> Vec<&MoveCommit> {
        self.events
            .iter()
            .filter_map(|event| match event {
                GridEvent::Committed(commit) => Some(commit),
                _ => None,
            })
            .collect()
    }

    pub fn cancellations(&self) -> Vec<&AppointmentId> {
        self.events
            .iter()
            .filter_map(|event| match event {
                GridEvent::Cancelled { appointment_id } => Some(appointment_id),
                _ => None,
            })
            .collect()
    }

    pub fn previews(&self) -> Vec<&CandidatePreview> {
        self.events
            .iter()
            .filter_map(|event| match event {
                GridEvent::CandidateChanged(preview) => Some(preview),
                _ => None,
            })
            .collect()
    }
}

impl GridEventSink for EventLog {
    fn on_candidate_changed(&mut self, preview: &CandidatePreview) {
        self.events.push(GridEvent::CandidateChanged(preview.clone()));
    }

    fn on_preview_cleared(&mut self) {
        self.events.push(GridEvent::PreviewCleared);
    }

    fn on_commit(&mut self, commit: &MoveCommit) {
        self.events.push(GridEvent::Committed(commit.clone()));
    }

    fn on_session_cancelled(&mut self, appointment_id: &AppointmentId) {
        self.events.push(GridEvent::Cancelled {
            appointment_id: appointment_id.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> CellTarget {
        CellTarget {
            cell: CellCoordinate::new(
                NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
                NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                "R1",
            ),
            rect: Rect::from_min_size(Pos2::new(0.0, 100.0), egui::vec2(120.0, 40.0)),
            availability: CellAvailability::Available,
        }
    }

    #[test]
    fn test_offset_inside_cell() {
        let event = PointerEvent::new(Pos2::new(10.0, 120.0), Some(target()));
        assert_eq!(event.offset_px(), Some(20.0));
    }

    #[test]
    fn test_offset_in_extended_area_is_top_edge() {
        let event = PointerEvent::new(Pos2::new(10.0, 90.0), Some(target()));
        assert_eq!(event.offset_px(), Some(0.0));
        assert_eq!(PointerEvent::outside(Pos2::ZERO).offset_px(), None);
    }

    #[test]
    fn test_event_log_records_in_order() {
        let mut log = EventLog::new();
        let commit = MoveCommit {
            appointment_id: AppointmentId::from("A"),
            new_date: NaiveDate::from_ymd_opt(2024, 6, 11).unwrap(),
            new_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            new_room_id: RoomId::from("R2"),
        };
        log.on_preview_cleared();
        log.on_commit(&commit);
        log.on_session_cancelled(&AppointmentId::from("B"));

        assert_eq!(log.events().len(), 3);
        assert_eq!(log.commits(), vec![&commit]);
        assert_eq!(log.cancellations(), vec![&AppointmentId::from("B")]);
        assert_eq!(log.take().len(), 3);
        assert!(log.events().is_empty());
    }

    #[test]
    fn test_grid_event_json_shape() {
        let event = GridEvent::Cancelled {
            appointment_id: AppointmentId::from("A"),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "cancelled");
        assert_eq!(json["appointmentId"], "A");
    }
}
