// Test fixtures - reusable test data
// Provides a consistent grid and appointment set across all test files

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime};
use clinic_agenda::models::appointment::{Appointment, RoomId};
use clinic_agenda::models::grid::{CellAvailability, CellCoordinate};
use clinic_agenda::models::settings::GridSettings;
use clinic_agenda::services::scheduling::{SlotGeometry, TimeGrid};
use clinic_agenda::ui_egui::{CellTarget, EventLog, GridLayout, InteractionController, PointerEvent};
use egui::Pos2;

/// Sample dates for testing
pub mod dates {
    use super::*;

    /// Monday, June 10 2024: the day every scenario runs on
    pub fn june_10() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    pub fn june_11() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 11).unwrap()
    }

    pub fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }
}

/// Sample appointments for testing
pub mod appointments {
    use super::dates::*;
    use super::*;

    pub fn on(id: &str, date: NaiveDate, h: u32, m: u32, duration: u32, room: &str) -> Appointment {
        Appointment::new(id, date, time(h, m), duration, room).unwrap()
    }

    /// A = 09:00 for 30 minutes in R1
    pub fn a() -> Appointment {
        on("A", june_10(), 9, 0, 30, "R1")
    }

    /// B = 10:00 for 30 minutes in R1
    pub fn b() -> Appointment {
        on("B", june_10(), 10, 0, 30, "R1")
    }

    /// C = 09:00 for 60 minutes in R2
    pub fn c() -> Appointment {
        on("C", june_10(), 9, 0, 60, "R2")
    }

    pub fn day() -> Vec<Appointment> {
        vec![a(), b(), c()]
    }
}

/// Grid, layout and controller wiring
pub mod grid {
    use super::dates::*;
    use super::*;

    pub const ORIGIN: Pos2 = Pos2::new(0.0, 0.0);
    pub const COLUMN_WIDTH: f32 = 100.0;

    /// 15-minute rows, 40 px tall, 5-minute hover and 15-minute move snapping
    pub fn settings() -> GridSettings {
        GridSettings::default()
    }

    pub fn rooms() -> Vec<RoomId> {
        vec![RoomId::from("R1"), RoomId::from("R2"), RoomId::from("R3")]
    }

    /// June 10 and 11, 08:00 to 12:00
    pub fn time_grid(settings: &GridSettings) -> TimeGrid {
        TimeGrid::for_days(
            vec![june_10(), june_11()],
            time(8, 0),
            time(12, 0),
            rooms(),
            SlotGeometry::from_settings(settings).unwrap(),
        )
        .unwrap()
    }

    pub fn layout(settings: &GridSettings) -> GridLayout {
        GridLayout::from_settings(ORIGIN, COLUMN_WIDTH, settings)
    }

    pub fn controller(settings: GridSettings) -> InteractionController<EventLog> {
        InteractionController::new(time_grid(&settings), settings, EventLog::new()).unwrap()
    }

    /// Pointer `offset_px` below the top edge of a cell
    pub fn at(
        controller: &InteractionController<EventLog>,
        date: NaiveDate,
        h: u32,
        m: u32,
        room: &str,
        offset_px: f32,
    ) -> PointerEvent {
        at_with(controller, date, h, m, room, offset_px, CellAvailability::Available)
    }

    pub fn at_with(
        controller: &InteractionController<EventLog>,
        date: NaiveDate,
        h: u32,
        m: u32,
        room: &str,
        offset_px: f32,
        availability: CellAvailability,
    ) -> PointerEvent {
        let layout = layout(controller.settings());
        let cell = CellCoordinate::new(date, time(h, m), room);
        let rect = layout.cell_rect(controller.grid(), &cell).unwrap();
        PointerEvent::new(
            Pos2::new(rect.center().x, rect.top() + offset_px),
            Some(CellTarget {
                cell,
                rect,
                availability,
            }),
        )
    }
}
