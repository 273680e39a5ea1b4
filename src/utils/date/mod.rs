// Date utility functions
// Minute-of-day arithmetic shared by the grid, snapper and conflict detector

use chrono::{NaiveTime, Timelike};

/// Number of minutes in a calendar day
pub const MINUTES_PER_DAY: i32 = 24 * 60;

/// Convert a time-of-day into minutes since midnight (seconds are dropped)
pub fn minutes_of_day(time: NaiveTime) -> i32 {
    (time.hour() * 60 + time.minute()) as i32
}

/// Convert minutes since midnight back into a time-of-day.
///
/// Returns `None` outside `[0, 24h)`.
pub fn time_from_minutes(minutes: i32) -> Option<NaiveTime> {
    if !(0..MINUTES_PER_DAY).contains(&minutes) {
        return None;
    }
    NaiveTime::from_hms_opt((minutes / 60) as u32, (minutes % 60) as u32, 0)
}

/// Format minutes since midnight as `HH:MM`
pub fn format_minutes(minutes: i32) -> String {
    format!("{:02}:{:02}", minutes.div_euclid(60), minutes.rem_euclid(60))
}

/// Exclusive end of a footprint, saturating instead of wrapping
pub fn footprint_end(start: i32, duration_minutes: u32) -> i32 {
    start.saturating_add(i32::try_from(duration_minutes).unwrap_or(i32::MAX))
}

/// Half-open interval overlap test: `[a_start, a_end)` and `[b_start, b_end)`
pub fn intervals_overlap(a_start: i32, a_end: i32, b_start: i32, b_end: i32) -> bool {
    a_start < b_end && b_start < a_end
}
