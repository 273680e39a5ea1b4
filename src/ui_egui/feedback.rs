//! Candidate feedback drawing.
//!
//! Zone tint over the hovered cell, a candidate line at the snapped time
//! with its label, and the faint extended hit regions above early hour rows.

use egui::{Color32, Pos2, Rect, Shape, Stroke};

use super::events::CandidatePreview;
use super::layout::GridLayout;
use crate::services::scheduling::{TimeGrid, ZoneType};
use crate::utils::date::{format_minutes, minutes_of_day};

/// Thickness of the candidate line
pub const INDICATOR_HEIGHT: f32 = 2.0;

pub fn zone_tint(zone: ZoneType) -> Color32 {
    match zone {
        ZoneType::Green => Color32::from_rgba_unmultiplied(120, 200, 120, 35),
        ZoneType::Blue => Color32::from_rgba_unmultiplied(100, 150, 230, 35),
        ZoneType::Blocked => Color32::from_rgba_unmultiplied(220, 80, 80, 45),
    }
}

pub fn zone_stroke(zone: ZoneType) -> Color32 {
    match zone {
        ZoneType::Green => Color32::from_rgb(60, 160, 60),
        ZoneType::Blue => Color32::from_rgb(60, 110, 210),
        ZoneType::Blocked => Color32::from_rgb(200, 50, 50),
    }
}

/// Horizontal band at the candidate time inside `cell_rect`
pub fn indicator_rect(cell_rect: Rect, pixel_offset: f32) -> Rect {
    let y = cell_rect.top() + pixel_offset;
    Rect::from_min_max(
        Pos2::new(cell_rect.left(), y - INDICATOR_HEIGHT / 2.0),
        Pos2::new(cell_rect.right(), y + INDICATOR_HEIGHT / 2.0),
    )
}

/// `cell_rect` grown upward by `extension` pixels
pub fn drop_hit_rect(cell_rect: Rect, extension: f32) -> Rect {
    Rect::from_min_max(
        Pos2::new(cell_rect.left(), cell_rect.top() - extension.max(0.0)),
        cell_rect.max,
    )
}

pub fn candidate_label(preview: &CandidatePreview) -> String {
    format_minutes(minutes_of_day(preview.time))
}

/// Tint and candidate line for `preview`, without the text label
pub fn candidate_shapes(cell_rect: Rect, preview: &CandidatePreview) -> Vec<Shape> {
    let line = indicator_rect(cell_rect, preview.pixel_offset);
    vec![
        Shape::rect_filled(cell_rect, 0.0, zone_tint(preview.zone)),
        Shape::line_segment(
            [line.left_center(), line.right_center()],
            Stroke::new(INDICATOR_HEIGHT, zone_stroke(preview.zone)),
        ),
    ]
}

pub fn draw_candidate_feedback(painter: &egui::Painter, cell_rect: Rect, preview: &CandidatePreview) {
    painter.extend(candidate_shapes(cell_rect, preview));

    let line = indicator_rect(cell_rect, preview.pixel_offset);
    painter.text(
        Pos2::new(line.left() + 4.0, line.top() - 1.0),
        egui::Align2::LEFT_BOTTOM,
        candidate_label(preview),
        egui::FontId::proportional(11.0),
        zone_stroke(preview.zone),
    );
}

/// The bands above cell tops that still hit the cell below
pub fn extended_area_rects(layout: &GridLayout, grid: &TimeGrid) -> Vec<Rect> {
    layout
        .targets(grid)
        .filter_map(|target| {
            let hit = layout.drop_rect(grid, &target.cell)?;
            (hit.top() < target.rect.top())
                .then(|| Rect::from_min_max(hit.min, Pos2::new(hit.right(), target.rect.top())))
        })
        .collect()
}

/// Faint outline of the extended hit regions while a drag is active
pub fn draw_extended_areas(painter: &egui::Painter, layout: &GridLayout, grid: &TimeGrid) {
    for band in extended_area_rects(layout, grid) {
        painter.rect_filled(band, 0.0, Color32::from_rgba_unmultiplied(120, 200, 120, 20));
    }
}
