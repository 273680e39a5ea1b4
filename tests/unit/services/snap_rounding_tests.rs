// Snap rounding table
// Nearest-multiple rounding with ties toward the later time

use clinic_agenda::error::SchedulingError;
use clinic_agenda::services::scheduling::snap::{round_to_granularity, snap_within_slot};
use clinic_agenda::services::scheduling::{snap, SnapBounds, Snapper};
use test_case::test_case;

#[test_case(0.0, 15 => 0 ; "zero stays at slot start")]
#[test_case(7.0, 15 => 0 ; "seven rounds down at fifteen")]
#[test_case(7.49, 15 => 0 ; "just below the tie rounds down")]
#[test_case(7.5, 15 => 15 ; "exact tie rounds to later time")]
#[test_case(8.0, 15 => 15 ; "eight rounds up at fifteen")]
#[test_case(22.5, 15 => 30 ; "second tie rounds up")]
#[test_case(2.5, 5 => 5 ; "tie at five")]
#[test_case(4.9, 10 => 0 ; "below half of ten")]
#[test_case(5.0, 10 => 10 ; "half of ten")]
#[test_case(-7.5, 15 => 0 ; "negative tie rounds toward later time")]
#[test_case(-7.6, 15 => -15 ; "negative past tie")]
#[test_case(44.0, 1 => 44 ; "unit granularity is identity on integers")]
fn test_snap_rounding(raw: f32, granularity: u32) -> i32 {
    snap(raw, granularity).unwrap()
}

#[test_case(-3.0, 5, 15 => 0 ; "clamped below")]
#[test_case(16.0, 5, 15 => 15 ; "clamped above")]
#[test_case(12.4, 5, 15 => 10 ; "inside cell")]
#[test_case(15.0, 10, 15 => 15 ; "rounded past slot end is capped")]
fn test_snap_within_slot(raw: f32, granularity: u32, slot: u32) -> i32 {
    snap_within_slot(raw, granularity, slot).unwrap()
}

#[test_case(0 ; "zero granularity")]
fn test_invalid_granularity(granularity: u32) {
    assert!(matches!(
        round_to_granularity(3.0, granularity),
        Err(SchedulingError::InvalidInput(_))
    ));
}

#[test]
fn test_snapper_bounds_differ_only_outside_cell() {
    let snapper = Snapper::new(5, 15).unwrap();
    for raw in [0.0_f32, 3.2, 7.5, 12.6] {
        assert_eq!(
            snapper.snap(raw, SnapBounds::Cell).unwrap(),
            snapper.snap(raw, SnapBounds::Unbounded).unwrap()
        );
    }
    assert_eq!(snapper.snap(-12.0, SnapBounds::Cell).unwrap(), 0);
    assert_eq!(snapper.snap(-12.0, SnapBounds::Unbounded).unwrap(), -10);
}
