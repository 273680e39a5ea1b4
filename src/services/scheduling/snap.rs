//! Granularity snapping.
//!
//! Quantizes raw pointer offsets (in minutes) to the configured granularity.
//! Rounding is to the nearest multiple with ties going to the later time, so
//! `7.5` minutes at a 15-minute granularity snaps to `15`. The functions here
//! are pure: the same raw input always yields the same output, which the
//! hover de-duplication relies on.

use crate::error::SchedulingError;
use crate::models::settings::BusinessHours;
use crate::utils::date::MINUTES_PER_DAY;

/// Whether a snapped offset is confined to the current cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapBounds {
    /// Hover and click: `[0, slot_duration]`
    Cell,
    /// Active drag: the offset may leave the cell; the caller re-derives the
    /// owning cell from the absolute time
    Unbounded,
}

fn check_granularity(granularity: u32) -> Result<(), SchedulingError> {
    if granularity == 0 {
        return Err(SchedulingError::invalid("granularity must be positive"));
    }
    Ok(())
}

/// Round `minutes` to the nearest multiple of `granularity`, ties upward
pub fn round_to_granularity(minutes: f64, granularity: u32) -> Result<i32, SchedulingError> {
    check_granularity(granularity)?;
    if !minutes.is_finite() {
        return Err(SchedulingError::invalid(format!(
            "raw offset must be finite, got {minutes}"
        )));
    }
    let g = granularity as f64;
    Ok(((minutes / g + 0.5).floor() * g) as i32)
}

/// Snap a raw minute offset to the granularity without any bounds
pub fn snap(raw_offset_minutes: f32, granularity: u32) -> Result<i32, SchedulingError> {
    round_to_granularity(raw_offset_minutes as f64, granularity)
}

/// Snap a raw minute offset and confine it to `[0, slot_duration]`
pub fn snap_within_slot(
    raw_offset_minutes: f32,
    granularity: u32,
    slot_duration: u32,
) -> Result<i32, SchedulingError> {
    if slot_duration == 0 {
        return Err(SchedulingError::invalid("slot duration must be positive"));
    }
    let slot = slot_duration as f32;
    let snapped = snap(raw_offset_minutes.clamp(0.0, slot), granularity)?;
    Ok(snapped.min(slot_duration as i32))
}

/// Granularity + slot duration bundle used by the interaction layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapper {
    granularity: u32,
    slot_duration: u32,
}

impl Snapper {
    pub fn new(granularity: u32, slot_duration: u32) -> Result<Self, SchedulingError> {
        check_granularity(granularity)?;
        if slot_duration == 0 {
            return Err(SchedulingError::invalid("slot duration must be positive"));
        }
        Ok(Self {
            granularity,
            slot_duration,
        })
    }

    pub fn granularity(&self) -> u32 {
        self.granularity
    }

    pub fn snap(&self, raw_offset_minutes: f32, bounds: SnapBounds) -> Result<i32, SchedulingError> {
        match bounds {
            SnapBounds::Cell => snap_within_slot(raw_offset_minutes, self.granularity, self.slot_duration),
            SnapBounds::Unbounded => snap(raw_offset_minutes, self.granularity),
        }
    }

    /// Clamp a snapped appointment start into the bookable window.
    ///
    /// Before opening it moves to the first granularity step at or after
    /// `open`; at or after closing it moves to `close - granularity`. Without
    /// business hours the window is the whole day. The result never goes
    /// below `open`, so a window shorter than one step (or an unaligned
    /// `open` with nothing aligned before closing) yields `open` itself.
    pub fn clamp_start(&self, start: i32, hours: Option<&BusinessHours>) -> i32 {
        let g = self.granularity as i32;
        let (open, close) = hours
            .map(|h| (h.open_minutes(), h.close_minutes()))
            .unwrap_or((0, MINUTES_PER_DAY));

        let mut start = start.max(0);
        if start < open {
            start = (open + g - 1) / g * g;
        }
        if start >= close {
            start = close - g;
        }
        start.max(open).min(MINUTES_PER_DAY - 1)
    }
}
