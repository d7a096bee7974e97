//! Cut availability windows into fixed-length open slots.
//!
//! Walks a cursor from the window start in steps of the slot length, emitting
//! `[cursor, cursor + length)` for every step whose cursor is still before the
//! window end. The last slot is not clipped to the window, so it may run past
//! `window.end`. Candidates blocked by an appointment are skipped.

use chrono::Duration;

use crate::model::{Appointment, AvailabilityWindow, Slot};
use crate::overlap::{OverlapPolicy, StartInstantOverlap};

/// Slice one window using [`StartInstantOverlap`].
///
/// `blocking` should already be narrowed to the appointments that hold their
/// time (see [`crate::overlap::blocking_at`]). A non-positive `slot_length`
/// yields no slots.
pub fn slice(
    window: &AvailabilityWindow,
    blocking: &[Appointment],
    slot_length: Duration,
) -> Vec<Slot> {
    slice_with(&StartInstantOverlap, window, blocking, slot_length)
}

/// Slice one window with an explicit overlap policy.
pub fn slice_with<P: OverlapPolicy + ?Sized>(
    policy: &P,
    window: &AvailabilityWindow,
    blocking: &[Appointment],
    slot_length: Duration,
) -> Vec<Slot> {
    if slot_length <= Duration::zero() {
        return Vec::new();
    }

    let mut slots = Vec::new();
    let mut cursor = window.start;

    while cursor < window.end {
        let Some(end) = cursor.checked_add_signed(slot_length) else {
            break;
        };
        if !policy.blocked_by_any(cursor, end, blocking) {
            slots.push(Slot {
                provider_id: window.provider_id.clone(),
                start: cursor,
                end,
            });
        }
        cursor = end;
    }

    slots
}

/// Slice every window of a provider, in window order.
pub fn slice_all<P: OverlapPolicy + ?Sized>(
    policy: &P,
    windows: &[AvailabilityWindow],
    blocking: &[Appointment],
    slot_length: Duration,
) -> Vec<Slot> {
    windows
        .iter()
        .flat_map(|w| slice_with(policy, w, blocking, slot_length))
        .collect()
}
