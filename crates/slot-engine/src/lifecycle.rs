//! Appointment lifecycle: `pending` at creation, `confirmed` on request.
//!
//! There is no way back to `pending` and no cancelled or expired state. The
//! `expires` timestamp is only read by [`Appointment::blocks_at`]; it never
//! changes the status on its own.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::model::{check_interval, Appointment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
        }
    }

    /// Legal edges of the lifecycle. Confirming twice is allowed.
    pub fn can_transition_to(self, next: AppointmentStatus) -> bool {
        matches!(
            (self, next),
            (AppointmentStatus::Pending, AppointmentStatus::Pending)
                | (AppointmentStatus::Pending, AppointmentStatus::Confirmed)
                | (AppointmentStatus::Confirmed, AppointmentStatus::Confirmed)
        )
    }

    pub fn is_terminal(self) -> bool {
        self == AppointmentStatus::Confirmed
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Appointment {
    /// Build a new pending appointment held until `now + hold`.
    ///
    /// Only the interval shape is checked here; booking rules are applied by
    /// [`crate::validator::validate`].
    pub fn pending(
        id: String,
        client_id: impl Into<String>,
        provider_id: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        now: DateTime<Utc>,
        hold: Duration,
    ) -> Result<Self> {
        check_interval(start, end)?;
        let expires = now.checked_add_signed(hold).ok_or_else(|| {
            ScheduleError::MalformedInput(format!("hold of {} from {} is out of range", hold, now))
        })?;
        Ok(Self {
            id,
            provider_id: provider_id.into(),
            client_id: client_id.into(),
            start,
            end,
            status: AppointmentStatus::Pending,
            created_at: now,
            expires,
        })
    }

    /// Move to `confirmed`. Returns `false` if it already was.
    pub fn confirm(&mut self) -> bool {
        debug_assert!(self.status.can_transition_to(AppointmentStatus::Confirmed));
        let changed = self.status != AppointmentStatus::Confirmed;
        self.status = AppointmentStatus::Confirmed;
        changed
    }
}
