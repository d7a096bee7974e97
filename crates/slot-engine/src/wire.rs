//! Transport-boundary codec: request DTOs with string timestamps and the JSON
//! encoding of responses.
//!
//! Responses serialize the domain types directly; chrono writes
//! `DateTime<Utc>` as RFC 3339.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::model::AvailabilityWindow;

/// Parse a timestamp into `DateTime<Utc>`.
///
/// Accepts RFC 3339 with any offset (e.g. "2026-03-02T09:00:00-05:00"),
/// normalized to UTC, and naive "2026-03-02T09:00:00", read as UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| ScheduleError::MalformedInput(format!("invalid timestamp '{}': {}", s, e)))
}

/// Body of an availability submission. The provider comes from the route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityRequest {
    pub start: String,
    pub end: String,
}

impl AvailabilityRequest {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn into_window(self, provider_id: &str) -> Result<AvailabilityWindow> {
        AvailabilityWindow::new(
            provider_id,
            parse_timestamp(&self.start)?,
            parse_timestamp(&self.end)?,
        )
    }
}

/// Body of an appointment submission. The client comes from the route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentRequest {
    pub provider_id: String,
    pub start: String,
    pub end: String,
}

/// An [`AppointmentRequest`] with its timestamps decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAppointment {
    pub provider_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl AppointmentRequest {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn decode(self) -> Result<DecodedAppointment> {
        Ok(DecodedAppointment {
            start: parse_timestamp(&self.start)?,
            end: parse_timestamp(&self.end)?,
            provider_id: self.provider_id,
        })
    }
}

/// Pretty-printed JSON for any response value.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_rfc3339_and_normalizes_offset() {
        let dt = parse_timestamp("2026-03-02T09:00:00-05:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 3, 2, 14, 0, 0).unwrap());
    }

    #[test]
    fn parses_naive_as_utc() {
        let dt = parse_timestamp("2026-03-02T09:00:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap());
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_timestamp("next tuesday").unwrap_err();
        assert!(matches!(err, ScheduleError::MalformedInput(_)));
    }

    #[test]
    fn availability_request_builds_window() {
        let req = AvailabilityRequest::from_json(
            r#"{"start":"2026-03-02T09:00:00Z","end":"2026-03-02T10:00:00Z"}"#,
        )
        .unwrap();
        let window = req.into_window("dr-who").unwrap();
        assert_eq!(window.provider_id, "dr-who");
        assert_eq!(window.duration(), chrono::Duration::hours(1));
    }

    #[test]
    fn availability_request_rejects_inverted_window() {
        let req = AvailabilityRequest {
            start: "2026-03-02T10:00:00Z".to_string(),
            end: "2026-03-02T09:00:00Z".to_string(),
        };
        assert!(matches!(
            req.into_window("p"),
            Err(ScheduleError::InvalidInterval { .. })
        ));
    }

    #[test]
    fn appointment_request_missing_field_is_malformed() {
        let err = AppointmentRequest::from_json(r#"{"start":"2026-03-02T09:00:00Z"}"#).unwrap_err();
        assert!(matches!(err, ScheduleError::MalformedInput(_)));
    }

    #[test]
    fn appointment_request_decodes() {
        let decoded = AppointmentRequest::from_json(
            r#"{"provider_id":"p","start":"2026-03-03T09:00:00Z","end":"2026-03-03T09:15:00Z"}"#,
        )
        .unwrap()
        .decode()
        .unwrap();
        assert_eq!(decoded.provider_id, "p");
        assert_eq!(decoded.end - decoded.start, chrono::Duration::minutes(15));
    }

    #[test]
    fn responses_use_rfc3339() {
        let window = AvailabilityWindow::new(
            "p",
            Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap(),
        )
        .unwrap();
        let json = to_json(&window).unwrap();
        assert!(json.contains("\"start\": \"2026-03-02T09:00:00Z\""));
    }
}
