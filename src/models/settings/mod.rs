// Settings module
// Grid geometry, snapping granularity and business-hours configuration

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::SchedulingError;
use crate::utils::date::{footprint_end, minutes_of_day, MINUTES_PER_DAY};

/// Opening window of the clinic for one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessHours {
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl BusinessHours {
    pub fn new(open: NaiveTime, close: NaiveTime) -> Result<Self, SchedulingError> {
        let hours = Self { open, close };
        hours.validate()?;
        Ok(hours)
    }

    pub fn validate(&self) -> Result<(), SchedulingError> {
        if self.open >= self.close {
            return Err(SchedulingError::invalid(format!(
                "business hours open {} must be before close {}",
                self.open, self.close
            )));
        }
        Ok(())
    }

    pub fn open_minutes(&self) -> i32 {
        minutes_of_day(self.open)
    }

    pub fn close_minutes(&self) -> i32 {
        minutes_of_day(self.close)
    }

    /// True when `minutes` falls inside `[open, close)`
    pub fn contains(&self, minutes: i32) -> bool {
        minutes >= self.open_minutes() && minutes < self.close_minutes()
    }

    /// True when `[start, start + duration)` fits inside `[open, close]`
    pub fn contains_footprint(&self, start: i32, duration_minutes: u32) -> bool {
        start >= self.open_minutes() && footprint_end(start, duration_minutes) <= self.close_minutes()
    }
}

/// Enlarged hit region above the early-morning cells for easier targeting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtendedDropArea {
    pub enabled: bool,
    /// How far above the cell's top edge the hit region reaches
    pub height_px: f32,
    /// Only hour-aligned cells strictly before this hour are extended
    pub until_hour: u32,
}

impl Default for ExtendedDropArea {
    fn default() -> Self {
        Self {
            enabled: true,
            height_px: 20.0,
            until_hour: 10,
        }
    }
}

impl ExtendedDropArea {
    /// Extra pixels above the cell starting at `slot_start`
    pub fn extension_for(&self, slot_start: NaiveTime) -> f32 {
        let minutes = minutes_of_day(slot_start);
        let on_the_hour = minutes % 60 == 0;
        let early = (minutes / 60) < self.until_hour as i32;
        if self.enabled && on_the_hour && early {
            self.height_px
        } else {
            0.0
        }
    }
}

/// User-tunable configuration for the appointment grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Minutes spanned by one grid row
    pub slot_duration: u32,
    /// Rendered height of one row in pixels
    pub cell_height_px: f32,
    /// Snap quantum for hover and pointer drag
    pub minute_granularity: u32,
    /// Snap quantum for click-to-move
    pub move_granularity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_hours: Option<BusinessHours>,
    pub extended_drop_area: ExtendedDropArea,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            slot_duration: 15,
            cell_height_px: 40.0,
            minute_granularity: 5,
            move_granularity: 15,
            business_hours: None,
            extended_drop_area: ExtendedDropArea::default(),
        }
    }
}

impl GridSettings {
    /// Validate the settings
    pub fn validate(&self) -> Result<(), SchedulingError> {
        if self.slot_duration == 0 || self.slot_duration > MINUTES_PER_DAY as u32 {
            return Err(SchedulingError::invalid(format!(
                "slot duration must be between 1 and {MINUTES_PER_DAY} minutes, got {}",
                self.slot_duration
            )));
        }

        if !(self.cell_height_px.is_finite() && self.cell_height_px > 0.0) {
            return Err(SchedulingError::invalid(format!(
                "cell height must be positive, got {}",
                self.cell_height_px
            )));
        }

        if self.minute_granularity == 0 || self.move_granularity == 0 {
            return Err(SchedulingError::invalid("granularity must be positive"));
        }
        if self.minute_granularity.max(self.move_granularity) > MINUTES_PER_DAY as u32 {
            return Err(SchedulingError::invalid("granularity cannot exceed a day"));
        }

        if !(self.extended_drop_area.height_px.is_finite() && self.extended_drop_area.height_px >= 0.0) {
            return Err(SchedulingError::invalid(
                "extended drop area height cannot be negative",
            ));
        }

        if let Some(hours) = &self.business_hours {
            hours.validate()?;
        }

        Ok(())
    }

    /// Parse settings from TOML, filling missing keys with defaults
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize settings to TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
