//! Time grid model.
//!
//! Maps days, a sorted list of time-of-day slots and a list of rooms into
//! addressable cells, and converts between pixel offsets inside a cell and
//! minute offsets inside that cell's time span.

use chrono::{NaiveDate, NaiveTime};

use crate::error::SchedulingError;
use crate::models::appointment::RoomId;
use crate::models::grid::CellCoordinate;
use crate::models::settings::GridSettings;
use crate::utils::date::{minutes_of_day, time_from_minutes, MINUTES_PER_DAY};

/// Per-slot geometry: how many minutes one row spans and how tall it is
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotGeometry {
    slot_duration: u32,
    cell_height_px: f32,
}

impl SlotGeometry {
    pub fn new(slot_duration: u32, cell_height_px: f32) -> Result<Self, SchedulingError> {
        if slot_duration == 0 {
            return Err(SchedulingError::invalid("slot duration must be positive"));
        }
        if !(cell_height_px.is_finite() && cell_height_px > 0.0) {
            return Err(SchedulingError::invalid("cell height must be positive"));
        }
        Ok(Self {
            slot_duration,
            cell_height_px,
        })
    }

    pub fn from_settings(settings: &GridSettings) -> Result<Self, SchedulingError> {
        Self::new(settings.slot_duration, settings.cell_height_px)
    }

    pub fn slot_duration(&self) -> u32 {
        self.slot_duration
    }

    pub fn cell_height_px(&self) -> f32 {
        self.cell_height_px
    }

    /// Pixel offset from the cell's top edge to minutes into the slot.
    /// Not clamped: offsets outside the cell map linearly.
    pub fn pixels_to_minutes(&self, offset_px: f32) -> f32 {
        offset_px / self.cell_height_px * self.slot_duration as f32
    }

    /// Minutes into the slot to a pixel offset from the cell's top edge
    pub fn minutes_to_pixels(&self, offset_minutes: i32) -> f32 {
        offset_minutes as f32 / self.slot_duration as f32 * self.cell_height_px
    }

    /// Absolute minutes since midnight for `(slot_time, minute_offset)`
    pub fn absolute_minutes(
        &self,
        slot_time: NaiveTime,
        minute_offset: i32,
    ) -> Result<i32, SchedulingError> {
        if minute_offset < 0 {
            return Err(SchedulingError::invalid(format!(
                "minute offset cannot be negative, got {minute_offset}"
            )));
        }
        Ok(minutes_of_day(slot_time) + minute_offset)
    }

    /// Absolute time-of-day for `(slot_time, minute_offset)`
    pub fn time_at(
        &self,
        slot_time: NaiveTime,
        minute_offset: i32,
    ) -> Result<NaiveTime, SchedulingError> {
        let minutes = self.absolute_minutes(slot_time, minute_offset)?;
        time_from_minutes(minutes).ok_or_else(|| {
            SchedulingError::invalid(format!("{slot_time} + {minute_offset}m runs past midnight"))
        })
    }
}

/// The addressable grid of one view: dates x slots x rooms
#[derive(Debug, Clone)]
pub struct TimeGrid {
    dates: Vec<NaiveDate>,
    slots: Vec<NaiveTime>,
    rooms: Vec<RoomId>,
    geometry: SlotGeometry,
}

impl TimeGrid {
    /// Build a grid from explicit slot start times. Slots are sorted and
    /// de-duplicated; they must not overlap given the slot duration.
    pub fn new(
        dates: Vec<NaiveDate>,
        mut slots: Vec<NaiveTime>,
        rooms: Vec<RoomId>,
        geometry: SlotGeometry,
    ) -> Result<Self, SchedulingError> {
        if dates.is_empty() {
            return Err(SchedulingError::invalid("a grid needs at least one date"));
        }
        if rooms.is_empty() {
            return Err(SchedulingError::invalid("a grid needs at least one room"));
        }

        slots.sort();
        slots.dedup();

        let step = geometry.slot_duration() as i32;
        for pair in slots.windows(2) {
            if minutes_of_day(pair[1]) - minutes_of_day(pair[0]) < step {
                return Err(SchedulingError::invalid(format!(
                    "slots {} and {} are closer than the slot duration",
                    pair[0], pair[1]
                )));
            }
        }

        Ok(Self {
            dates,
            slots,
            rooms,
            geometry,
        })
    }

    /// Build a single-day grid with one slot every `slot_duration` minutes
    /// in `[open, close)`
    pub fn for_day(
        date: NaiveDate,
        open: NaiveTime,
        close: NaiveTime,
        rooms: Vec<RoomId>,
        geometry: SlotGeometry,
    ) -> Result<Self, SchedulingError> {
        Self::for_days(vec![date], open, close, rooms, geometry)
    }

    /// Multi-day variant of [`TimeGrid::for_day`] (weekly views)
    pub fn for_days(
        dates: Vec<NaiveDate>,
        open: NaiveTime,
        close: NaiveTime,
        rooms: Vec<RoomId>,
        geometry: SlotGeometry,
    ) -> Result<Self, SchedulingError> {
        let start = minutes_of_day(open);
        let end = if close == NaiveTime::MIN {
            MINUTES_PER_DAY
        } else {
            minutes_of_day(close)
        };
        if start >= end {
            return Err(SchedulingError::invalid(format!(
                "grid open {open} must be before close {close}"
            )));
        }

        let slots = (start..end)
            .step_by(geometry.slot_duration() as usize)
            .filter_map(time_from_minutes)
            .collect();

        Self::new(dates, slots, rooms, geometry)
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn slots(&self) -> &[NaiveTime] {
        &self.slots
    }

    pub fn rooms(&self) -> &[RoomId] {
        &self.rooms
    }

    pub fn geometry(&self) -> &SlotGeometry {
        &self.geometry
    }

    /// Every cell, date-major then room then slot
    pub fn cells(&self) -> impl Iterator<Item = CellCoordinate> + '_ {
        self.dates.iter().flat_map(move |date| {
            self.rooms.iter().flat_map(move |room| {
                self.slots
                    .iter()
                    .map(move |slot| CellCoordinate::new(*date, *slot, room.clone()))
            })
        })
    }

    pub fn slot_index(&self, time: NaiveTime) -> Option<usize> {
        let minutes = minutes_of_day(time);
        self.slots.iter().position(|slot| minutes_of_day(*slot) == minutes)
    }

    /// Column index of `(date, room)`, date-major
    pub fn column_index(&self, date: NaiveDate, room_id: &RoomId) -> Option<usize> {
        let day = self.dates.iter().position(|d| *d == date)?;
        let room = self.rooms.iter().position(|r| r == room_id)?;
        Some(day * self.rooms.len() + room)
    }

    pub fn column_count(&self) -> usize {
        self.dates.len() * self.rooms.len()
    }

    /// Start of the slot whose span `[start, start + slot_duration)` holds
    /// `minutes`, re-deriving the owning row from an absolute time
    pub fn slot_containing(&self, minutes: i32) -> Option<NaiveTime> {
        let step = self.geometry.slot_duration() as i32;
        let idx = self
            .slots
            .partition_point(|slot| minutes_of_day(*slot) <= minutes);
        let slot = *self.slots.get(idx.checked_sub(1)?)?;
        (minutes < minutes_of_day(slot) + step).then_some(slot)
    }

    /// The cell owning `minutes` in column `(date, room)`
    pub fn cell_for(&self, date: NaiveDate, room_id: &RoomId, minutes: i32) -> Option<CellCoordinate> {
        self.column_index(date, room_id)?;
        let slot = self.slot_containing(minutes)?;
        Some(CellCoordinate::new(date, slot, room_id.clone()))
    }
}
