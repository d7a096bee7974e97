//! Error types for slot-engine operations.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Reasons a proposed appointment cannot be booked.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// The appointment starts before the advance-notice lead time has elapsed.
    #[error("appointments must be booked in advance: start {start} is before {earliest}")]
    TooSoon {
        start: DateTime<Utc>,
        earliest: DateTime<Utc>,
    },

    /// No open slot of the provider starts inside the requested span.
    #[error("provider {provider_id} is not available at {start}")]
    ProviderUnavailable {
        provider_id: String,
        start: DateTime<Utc>,
    },
}

/// The kind of record a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Availability,
    Appointment,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Availability => f.write_str("availability"),
            RecordKind::Appointment => f.write_str("appointment"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error(transparent)]
    Booking(#[from] BookingError),

    #[error("no {kind} was found with ID {id}")]
    NotFound { kind: RecordKind, id: String },

    /// A window or appointment whose end is not strictly after its start.
    #[error("invalid interval: end {end} is not after start {start}")]
    InvalidInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// Input that could not be decoded into the domain types.
    #[error("malformed input: {0}")]
    MalformedInput(String),
}

impl ScheduleError {
    pub fn availability_not_found(provider_id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: RecordKind::Availability,
            id: provider_id.into(),
        }
    }

    pub fn appointment_not_found(appointment_id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: RecordKind::Appointment,
            id: appointment_id.into(),
        }
    }

    /// Returns `true` for the `NotFound` variant, whatever the record kind.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<serde_json::Error> for ScheduleError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedInput(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
