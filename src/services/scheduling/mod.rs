// Scheduling service module
// Pure grid geometry, snapping, conflict and zone logic behind the agenda cell

pub mod conflict;
pub mod geometry;
pub mod snap;
pub mod zones;

pub use conflict::{check_placement, find_conflict, has_conflict, AppointmentSource, Placement};
pub use geometry::{SlotGeometry, TimeGrid};
pub use snap::{snap, snap_within_slot, SnapBounds, Snapper};
pub use zones::{classify, classify_rule, ZoneRule, ZoneType};
