//! Hover/preview de-duplication.
//!
//! Pointer moves arrive far more often than the snapped candidate changes.
//! The coordinator keeps the key of the last preview it let through and
//! only reports a change when the key differs from the immediately
//! preceding one. It is a cache, not a debouncer: nothing is delayed.
//!
//! One coordinator is owned by each grid controller; there is no shared
//! hover state between grids.

use chrono::NaiveDate;

use super::events::CandidatePreview;
use crate::models::appointment::RoomId;
use crate::services::scheduling::ZoneType;
use crate::utils::date::minutes_of_day;

/// Comparable summary of a preview
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PreviewKey {
    pub date: NaiveDate,
    pub room_id: RoomId,
    pub minutes: i32,
    pub pixel_bucket: i32,
    pub zone: ZoneType,
}

impl PreviewKey {
    pub fn from_preview(preview: &CandidatePreview) -> Self {
        Self {
            date: preview.date,
            room_id: preview.room_id.clone(),
            minutes: minutes_of_day(preview.time),
            pixel_bucket: preview.pixel_offset.round() as i32,
            zone: preview.zone,
        }
    }
}

#[derive(Debug, Default)]
pub struct HoverCoordinator {
    last: Option<PreviewKey>,
    emitted: usize,
    suppressed: usize,
}

impl HoverCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when `preview` differs from the previous one and
    /// should be propagated
    pub fn offer(&mut self, preview: &CandidatePreview) -> bool {
        let key = PreviewKey::from_preview(preview);
        if self.last.as_ref() == Some(&key) {
            self.suppressed += 1;
            return false;
        }
        self.last = Some(key);
        self.emitted += 1;
        true
    }

    /// Forget the current preview. Returns true if one was showing.
    pub fn clear(&mut self) -> bool {
        self.last.take().is_some()
    }

    /// Forget the preview and the counters
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn current(&self) -> Option<&PreviewKey> {
        self.last.as_ref()
    }

    pub fn emitted(&self) -> usize {
        self.emitted
    }

    pub fn suppressed(&self) -> usize {
        self.suppressed
    }
}
