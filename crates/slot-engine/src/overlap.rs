//! Policies deciding whether an appointment takes a candidate slot out of the
//! open set.
//!
//! The default, [`StartInstantOverlap`], only looks at the slot's start
//! instant: a slot is blocked when an appointment's `[start, end)` contains
//! it. [`IntervalOverlap`] tests the full half-open intersection instead.

use chrono::{DateTime, Utc};

use crate::model::Appointment;

/// Decides whether `appointment` blocks the candidate slot `[start, end)`.
pub trait OverlapPolicy {
    fn blocks(&self, start: DateTime<Utc>, end: DateTime<Utc>, appointment: &Appointment) -> bool;

    /// Whether any of `appointments` blocks the candidate slot.
    fn blocked_by_any(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        appointments: &[Appointment],
    ) -> bool {
        appointments.iter().any(|a| self.blocks(start, end, a))
    }
}

/// Blocked iff the slot's start lies in `[appointment.start, appointment.end)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StartInstantOverlap;

impl OverlapPolicy for StartInstantOverlap {
    fn blocks(&self, start: DateTime<Utc>, _end: DateTime<Utc>, appointment: &Appointment) -> bool {
        appointment.contains(start)
    }
}

/// Blocked iff `[start, end)` and the appointment intersect. Adjacent
/// intervals (one ends exactly when the other starts) do not block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntervalOverlap;

impl OverlapPolicy for IntervalOverlap {
    fn blocks(&self, start: DateTime<Utc>, end: DateTime<Utc>, appointment: &Appointment) -> bool {
        start < appointment.end && appointment.start < end
    }
}

/// The appointments that still hold their time at `now`.
pub fn blocking_at(appointments: &[Appointment], now: DateTime<Utc>) -> Vec<Appointment> {
    appointments
        .iter()
        .filter(|a| a.blocks_at(now))
        .cloned()
        .collect()
}
