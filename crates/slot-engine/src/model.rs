//! Core scheduling records: availability windows, appointments, and the slots
//! derived from them.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::lifecycle::AppointmentStatus;

/// Reject intervals whose end is not strictly after their start.
pub(crate) fn check_interval(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<()> {
    if end <= start {
        return Err(ScheduleError::InvalidInterval { start, end });
    }
    Ok(())
}

/// A provider-declared span of time during which they can be booked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub provider_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl AvailabilityWindow {
    /// Build a window, rejecting `end <= start` with `InvalidInterval`.
    pub fn new(
        provider_id: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self> {
        check_interval(start, end)?;
        Ok(Self {
            provider_id: provider_id.into(),
            start,
            end,
        })
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Whether the two windows overlap or touch end-to-start.
    pub fn touches(&self, other: &AvailabilityWindow) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// A booked (or held) appointment between a client and a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub provider_id: String,
    pub client_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    /// End of the pending hold. Never changes after creation.
    pub expires: DateTime<Utc>,
}

impl Appointment {
    /// Whether the appointment still holds its time at `now`.
    ///
    /// A pending appointment holds strictly before `expires`; a confirmed
    /// one holds at every instant, `expires` included.
    pub fn blocks_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires || self.status != AppointmentStatus::Pending
    }

    /// A pending appointment whose hold has run out. Purely informational:
    /// nothing moves a lapsed appointment out of `Pending`.
    pub fn is_lapsed(&self, now: DateTime<Utc>) -> bool {
        self.status == AppointmentStatus::Pending && now >= self.expires
    }

    /// Whether `instant` falls inside `[start, end)`.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// A fixed-length, currently bookable sub-interval of an availability window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub provider_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// The open slots of one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSlots {
    pub provider_id: String,
    pub slots: Vec<Slot>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, hour, min, 0).unwrap()
    }

    fn appointment(status: AppointmentStatus) -> Appointment {
        Appointment {
            id: "a-1".to_string(),
            provider_id: "p-1".to_string(),
            client_id: "c-1".to_string(),
            start: at(9, 15),
            end: at(9, 30),
            status,
            created_at: at(8, 0),
            expires: at(8, 30),
        }
    }

    #[test]
    fn window_rejects_empty_and_inverted_intervals() {
        assert!(AvailabilityWindow::new("p", at(9, 0), at(9, 0)).is_err());
        assert!(matches!(
            AvailabilityWindow::new("p", at(10, 0), at(9, 0)),
            Err(ScheduleError::InvalidInterval { .. })
        ));
        assert!(AvailabilityWindow::new("p", at(9, 0), at(9, 1)).is_ok());
    }

    #[test]
    fn pending_blocks_only_until_expiry() {
        let a = appointment(AppointmentStatus::Pending);
        assert!(a.blocks_at(at(8, 29)));
        assert!(!a.blocks_at(at(8, 30)));
        assert!(!a.blocks_at(at(8, 31)));
    }

    #[test]
    fn confirmed_blocks_at_every_instant() {
        let a = appointment(AppointmentStatus::Confirmed);
        assert!(a.blocks_at(at(8, 0)));
        assert!(a.blocks_at(at(8, 30)));
        assert!(a.blocks_at(at(12, 0)));
    }

    #[test]
    fn lapsed_only_applies_to_pending() {
        assert!(appointment(AppointmentStatus::Pending).is_lapsed(at(8, 30)));
        assert!(!appointment(AppointmentStatus::Pending).is_lapsed(at(8, 29)));
        assert!(!appointment(AppointmentStatus::Confirmed).is_lapsed(at(9, 0)));
    }

    #[test]
    fn contains_is_half_open() {
        let a = appointment(AppointmentStatus::Pending);
        assert!(a.contains(at(9, 15)));
        assert!(a.contains(at(9, 29)));
        assert!(!a.contains(at(9, 30)));
        assert!(!a.contains(at(9, 14)));
    }
}
