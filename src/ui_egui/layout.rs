//! Screen layout of the time grid.
//!
//! Columns run date-major then room; rows follow the grid's slots. Hour
//! cells early in the day get a hit region that reaches above their top
//! edge (see [`ExtendedDropArea`]).

use std::collections::HashMap;

use egui::{Pos2, Rect, Vec2};

use super::events::{CellTarget, PointerEvent};
use super::feedback::drop_hit_rect;
use crate::models::grid::{CellAvailability, CellCoordinate};
use crate::models::settings::{ExtendedDropArea, GridSettings};
use crate::services::scheduling::TimeGrid;

#[derive(Clone, Debug)]
pub struct GridLayout {
    origin: Pos2,
    column_width: f32,
    cell_height: f32,
    extended: ExtendedDropArea,
    availability: HashMap<CellCoordinate, CellAvailability>,
}

impl GridLayout {
    pub fn new(origin: Pos2, column_width: f32, cell_height: f32, extended: ExtendedDropArea) -> Self {
        Self {
            origin,
            column_width,
            cell_height,
            extended,
            availability: HashMap::new(),
        }
    }

    pub fn from_settings(origin: Pos2, column_width: f32, settings: &GridSettings) -> Self {
        Self::new(
            origin,
            column_width,
            settings.cell_height_px,
            settings.extended_drop_area,
        )
    }

    /// Mark a cell inactive or overridden; unmarked cells are available
    pub fn set_availability(&mut self, cell: CellCoordinate, availability: CellAvailability) {
        if availability == CellAvailability::Available {
            self.availability.remove(&cell);
        } else {
            self.availability.insert(cell, availability);
        }
    }

    pub fn availability(&self, cell: &CellCoordinate) -> CellAvailability {
        self.availability.get(cell).copied().unwrap_or_default()
    }

    pub fn cell_rect(&self, grid: &TimeGrid, cell: &CellCoordinate) -> Option<Rect> {
        let column = grid.column_index(cell.date, &cell.room_id)?;
        let row = grid.slot_index(cell.time)?;
        let min = Pos2::new(
            self.origin.x + column as f32 * self.column_width,
            self.origin.y + row as f32 * self.cell_height,
        );
        Some(Rect::from_min_size(min, Vec2::new(self.column_width, self.cell_height)))
    }

    /// Hit region of a cell, including its extension above the top edge
    pub fn drop_rect(&self, grid: &TimeGrid, cell: &CellCoordinate) -> Option<Rect> {
        let rect = self.cell_rect(grid, cell)?;
        Some(drop_hit_rect(rect, self.extended.extension_for(cell.time)))
    }

    /// Every cell with its on-screen rectangle
    pub fn targets<'a>(&'a self, grid: &'a TimeGrid) -> impl Iterator<Item = CellTarget> + 'a {
        grid.cells().filter_map(move |cell| {
            let rect = self.cell_rect(grid, &cell)?;
            let availability = self.availability(&cell);
            Some(CellTarget {
                cell,
                rect,
                availability,
            })
        })
    }

    /// The cell whose hit region holds `pos`
    pub fn hit_test(&self, grid: &TimeGrid, pos: Pos2) -> Option<CellTarget> {
        if !pos.x.is_finite() || !pos.y.is_finite() {
            return None;
        }
        if self.column_width <= 0.0 || self.cell_height <= 0.0 {
            return None;
        }

        let column = ((pos.x - self.origin.x) / self.column_width).floor();
        if column < 0.0 || column as usize >= grid.column_count() {
            return None;
        }
        let column = column as usize;
        let room_count = grid.rooms().len();
        let date = *grid.dates().get(column / room_count)?;
        let room_id = grid.rooms().get(column % room_count)?.clone();

        let slots = grid.slots();
        let rel_y = pos.y - self.origin.y;
        let row = (rel_y / self.cell_height).floor();
        let mut hit = (row >= 0.0 && (row as usize) < slots.len()).then_some(row as usize);

        // The row below may claim the point through its extension
        let next = if row < 0.0 { 0 } else { row as usize + 1 };
        if let Some(next_slot) = slots.get(next) {
            let top = self.origin.y + next as f32 * self.cell_height;
            let extension = self.extended.extension_for(*next_slot);
            if pos.y < top && pos.y >= top - extension {
                hit = Some(next);
            }
        }

        let cell = CellCoordinate::new(date, *slots.get(hit?)?, room_id);
        let rect = self.cell_rect(grid, &cell)?;
        let availability = self.availability(&cell);
        Some(CellTarget {
            cell,
            rect,
            availability,
        })
    }

    pub fn pointer_event(&self, grid: &TimeGrid, pos: Pos2) -> PointerEvent {
        PointerEvent::new(pos, self.hit_test(grid, pos))
    }
}
