//! Property-based tests for slicing and booking validation using proptest.
//!
//! These check invariants that should hold for *any* window, slot length and
//! appointment set, not just the fixed scenarios in `slicer_tests.rs`.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use slot_engine::{can_book, slice, Appointment, AppointmentStatus, AvailabilityWindow, Slot};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap()
}

/// A window starting within the first day, 1 minute to 10 hours long.
fn arb_window() -> impl Strategy<Value = AvailabilityWindow> {
    (0i64..1440, 1i64..=600).prop_map(|(offset, length)| {
        let start = base() + Duration::minutes(offset);
        AvailabilityWindow::new("p", start, start + Duration::minutes(length)).unwrap()
    })
}

fn arb_slot_length() -> impl Strategy<Value = i64> {
    prop_oneof![Just(10i64), Just(15), Just(20), Just(30), Just(45), Just(60), 1i64..=90]
}

/// Up to 6 appointments somewhere in the first two days.
fn arb_appointments() -> impl Strategy<Value = Vec<Appointment>> {
    prop::collection::vec((0i64..2880, 1i64..=120), 0..6).prop_map(|spans| {
        spans
            .into_iter()
            .enumerate()
            .map(|(i, (offset, length))| {
                let start = base() + Duration::minutes(offset);
                Appointment {
                    id: format!("a{}", i),
                    provider_id: "p".to_string(),
                    client_id: "c".to_string(),
                    start,
                    end: start + Duration::minutes(length),
                    status: AppointmentStatus::Confirmed,
                    created_at: base(),
                    expires: base(),
                }
            })
            .collect()
    })
}

fn ceil_div(a: i64, b: i64) -> i64 {
    (a + b - 1) / b
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Without appointments the grid has ceil(window / length) contiguous slots.
    #[test]
    fn empty_grid_covers_window(window in arb_window(), length in arb_slot_length()) {
        let slots = slice(&window, &[], Duration::minutes(length));
        let expected = ceil_div(window.duration().num_minutes(), length);

        prop_assert_eq!(slots.len() as i64, expected);
        prop_assert_eq!(slots[0].start, window.start);
        for pair in slots.windows(2) {
            prop_assert_eq!(pair[0].end, pair[1].start);
        }
        let last = slots.last().unwrap();
        prop_assert!(last.start < window.end);
        prop_assert!(last.end >= window.end);
        prop_assert!(last.end - window.end < Duration::minutes(length));
    }

    /// Every slot is exactly one length wide and in ascending order.
    #[test]
    fn slots_are_uniform_and_sorted(
        window in arb_window(),
        length in arb_slot_length(),
        appointments in arb_appointments(),
    ) {
        let slots = slice(&window, &appointments, Duration::minutes(length));
        for slot in &slots {
            prop_assert_eq!(slot.end - slot.start, Duration::minutes(length));
        }
        for pair in slots.windows(2) {
            prop_assert!(pair[0].start < pair[1].start);
        }
    }

    /// A grid start is missing iff some appointment contains it.
    #[test]
    fn blocked_starts_are_exactly_those_inside_appointments(
        window in arb_window(),
        length in arb_slot_length(),
        appointments in arb_appointments(),
    ) {
        let grid = slice(&window, &[], Duration::minutes(length));
        let open = slice(&window, &appointments, Duration::minutes(length));

        for candidate in &grid {
            let blocked = appointments.iter().any(|a| a.contains(candidate.start));
            let present = open.iter().any(|s| s.start == candidate.start);
            prop_assert_eq!(blocked, !present);
        }
    }

    /// Anything starting within 24 hours of `now` is refused, slots or not.
    #[test]
    fn short_notice_is_never_bookable(lead_minutes in 0i64..(24 * 60)) {
        let now = base();
        let start = now + Duration::minutes(lead_minutes);
        let proposed = Appointment::pending(
            "x".to_string(), "c", "p", start, start + Duration::minutes(15), now, Duration::minutes(30),
        ).unwrap();
        let slot = Slot { provider_id: "p".to_string(), start, end: start + Duration::minutes(15) };

        prop_assert!(!can_book(&proposed, &[slot], now));
    }

    /// With enough notice, booking succeeds iff a slot starts inside the span.
    #[test]
    fn bookable_iff_a_slot_starts_inside(
        lead_hours in 24i64..96,
        slot_offsets in prop::collection::vec(-60i64..60, 0..6),
    ) {
        let now = base();
        let start = now + Duration::hours(lead_hours);
        let end = start + Duration::minutes(15);
        let proposed = Appointment::pending(
            "x".to_string(), "c", "p", start, end, now, Duration::minutes(30),
        ).unwrap();
        let slots: Vec<Slot> = slot_offsets
            .iter()
            .map(|m| {
                let s = start + Duration::minutes(*m);
                Slot { provider_id: "p".to_string(), start: s, end: s + Duration::minutes(15) }
            })
            .collect();

        let expected = slots.iter().any(|s| start <= s.start && s.start < end);
        prop_assert_eq!(can_book(&proposed, &slots, now), expected);
    }
}
