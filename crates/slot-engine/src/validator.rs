//! Booking eligibility rules.
//!
//! A proposed appointment is admitted when both hold:
//!
//! 1. **Advance notice**: it starts at least the lead time (24 hours by
//!    default) after `now`.
//! 2. **Availability**: some open slot starts inside `[proposed.start,
//!    proposed.end)` and the proposed appointment's own hold is live at `now`
//!    (see [`Appointment::blocks_at`]). Raw availability windows carry no
//!    expiry; only the appointment side of the check is time-limited.
//!
//! Rules are checked in that order and the first failure is reported.

use chrono::{DateTime, Duration, Utc};

use crate::error::BookingError;
use crate::model::{Appointment, Slot};

/// Default minimum lead time, in hours, between submission and appointment start.
pub const DEFAULT_ADVANCE_NOTICE_HOURS: i64 = 24;

/// Validate with the default 24-hour advance notice.
pub fn validate(
    proposed: &Appointment,
    provider_slots: &[Slot],
    now: DateTime<Utc>,
) -> Result<(), BookingError> {
    validate_with_notice(
        proposed,
        provider_slots,
        now,
        Duration::hours(DEFAULT_ADVANCE_NOTICE_HOURS),
    )
}

/// Validate with an explicit advance-notice lead time.
pub fn validate_with_notice(
    proposed: &Appointment,
    provider_slots: &[Slot],
    now: DateTime<Utc>,
    advance_notice: Duration,
) -> Result<(), BookingError> {
    let earliest = match now.checked_add_signed(advance_notice) {
        Some(earliest) => earliest,
        None if advance_notice < Duration::zero() => DateTime::<Utc>::MIN_UTC,
        None => DateTime::<Utc>::MAX_UTC,
    };
    if proposed.start < earliest {
        return Err(BookingError::TooSoon {
            start: proposed.start,
            earliest,
        });
    }

    if !provider_slots.iter().any(|slot| covers(slot, proposed, now)) {
        return Err(BookingError::ProviderUnavailable {
            provider_id: proposed.provider_id.clone(),
            start: proposed.start,
        });
    }

    Ok(())
}

/// `true` iff [`validate`] would admit the appointment.
pub fn can_book(proposed: &Appointment, provider_slots: &[Slot], now: DateTime<Utc>) -> bool {
    validate(proposed, provider_slots, now).is_ok()
}

fn covers(slot: &Slot, proposed: &Appointment, now: DateTime<Utc>) -> bool {
    proposed.contains(slot.start) && proposed.blocks_at(now)
}
