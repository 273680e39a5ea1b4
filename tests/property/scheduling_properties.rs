// Property-based tests for the scheduling core
// Snap determinism, footprint classification and the no-overlap guarantee

#[path = "../fixtures/mod.rs"]
mod fixtures;

use chrono::NaiveTime;
use clinic_agenda::models::appointment::{Appointment, AppointmentId, RoomId};
use clinic_agenda::models::grid::CandidateSlot;
use clinic_agenda::services::scheduling::{classify, has_conflict, snap, Placement, ZoneType};
use clinic_agenda::ui_egui::SessionOutcome;
use fixtures::dates::june_10;
use fixtures::grid::{at, controller, settings};
use proptest::prelude::*;

fn granularity() -> impl Strategy<Value = u32> {
    prop_oneof![Just(1u32), Just(5), Just(10), Just(15), Just(30)]
}

fn appointment(id: &str, start: u32, duration: u32, room: &str) -> Appointment {
    let time = NaiveTime::from_hms_opt(start / 60, start % 60, 0).unwrap();
    Appointment::new(id, june_10(), time, duration, room).unwrap()
}

proptest! {
    /// Property: snapping an already snapped value changes nothing
    #[test]
    fn prop_snap_is_idempotent(raw in -600.0f32..600.0, g in granularity()) {
        let once = snap(raw, g).unwrap();
        prop_assert_eq!(snap(once as f32, g).unwrap(), once);
        prop_assert_eq!(once % g as i32, 0);
    }

    /// Property: identical raw input always yields the same output
    #[test]
    fn prop_snap_is_deterministic(raw in -600.0f32..600.0, g in granularity()) {
        prop_assert_eq!(snap(raw, g).unwrap(), snap(raw, g).unwrap());
    }

    /// Property: snapping never moves further than half a step
    #[test]
    fn prop_snap_is_nearest(raw in -600.0f32..600.0, g in granularity()) {
        let snapped = snap(raw, g).unwrap() as f32;
        prop_assert!((snapped - raw).abs() <= g as f32 / 2.0 + 1e-3);
    }

    /// Property: any slot inside the dragged appointment's own footprint is green,
    /// whatever else is in the list
    #[test]
    fn prop_own_footprint_never_blocked(
        start in 480u32..1080,
        duration in 1u32..180,
        offset_seed in 0u32..10_000,
        neighbours in prop::collection::vec((480u32..1200, 1u32..120), 0..6),
    ) {
        let moved = appointment("A", start, duration, "R1");
        let mut existing = vec![moved.clone()];
        for (i, (s, d)) in neighbours.into_iter().enumerate() {
            existing.push(appointment(&format!("N{i}"), s, d, "R1"));
        }

        let inside = start + offset_seed % duration;
        let candidate = CandidateSlot {
            date: june_10(),
            time: NaiveTime::from_hms_opt(inside / 60, inside % 60, 0).unwrap(),
            room_id: RoomId::from("R1"),
            offset_minutes: 0,
        };
        prop_assert_eq!(classify(&candidate, &moved, &existing), ZoneType::Green);
    }

    /// Property: the moved appointment never conflicts with itself
    #[test]
    fn prop_excluded_self_never_conflicts(
        start in 0u32..1300,
        duration in 1u32..120,
        candidate_start in 0u32..1300,
        candidate_duration in 1u32..120,
    ) {
        let a = appointment("A", start, duration, "R1");
        let room = RoomId::from("R1");
        let time = NaiveTime::from_hms_opt(candidate_start / 60, candidate_start % 60, 0).unwrap();
        let placement = Placement::new(june_10(), time, &room, candidate_duration);
        prop_assert!(!has_conflict(&placement, &[a], Some(&AppointmentId::from("A"))));
    }

    /// Property: after any committed drag, no two appointments in a room overlap
    #[test]
    fn prop_commit_never_creates_overlap(
        row in 0u32..16,
        room in 0usize..3,
        offset_px in 0.0f32..40.0,
        grab_px in 0.0f32..40.0,
    ) {
        let rooms = ["R1", "R2", "R3"];
        let mut list = vec![
            appointment("A", 540, 30, "R1"),
            appointment("B", 600, 30, "R1"),
            appointment("C", 540, 60, "R2"),
            appointment("D", 630, 45, "R3"),
        ];
        let mut ctl = controller(settings());
        ctl.begin_drag(&list[0], grab_px).unwrap();

        let minutes = 480 + row * 15;
        let event = at(&ctl, june_10(), minutes / 60, minutes % 60, rooms[room], offset_px);
        ctl.pointer_moved(&event, &list).unwrap();
        let outcome = ctl.drop(&event, &list).unwrap();

        if let SessionOutcome::Committed(commit) = outcome {
            let apt = list.iter_mut().find(|apt| apt.id == commit.appointment_id).unwrap();
            apt.date = commit.new_date;
            apt.start_time = commit.new_time;
            apt.room_id = commit.new_room_id.clone();
        }

        for (i, a) in list.iter().enumerate() {
            for b in &list[i + 1..] {
                if a.date == b.date && a.room_id == b.room_id {
                    prop_assert!(a.end_minutes() <= b.start_minutes() || b.end_minutes() <= a.start_minutes());
                }
            }
        }
        prop_assert!(ctl.state().is_idle());
    }
}
