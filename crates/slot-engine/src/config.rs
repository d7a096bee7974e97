//! Scheduler configuration.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::store::AvailabilityMode;
use crate::validator::DEFAULT_ADVANCE_NOTICE_HOURS;

/// Default slot width in minutes.
pub const DEFAULT_SLOT_MINUTES: i64 = 15;

/// Default pending hold in minutes.
pub const DEFAULT_HOLD_MINUTES: i64 = 30;

/// Upper bound for any duration in a config file: one leap year.
pub const MAX_CONFIG_MINUTES: i64 = 366 * 24 * 60;

/// Scheduler configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Width of every open slot.
    pub slot_length: Duration,

    /// Minimum lead time between submission and appointment start.
    pub advance_notice: Duration,

    /// How long a pending appointment holds its time.
    pub hold_duration: Duration,

    /// What happens to existing windows when a provider submits a new one.
    pub availability_mode: AvailabilityMode,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            slot_length: Duration::minutes(DEFAULT_SLOT_MINUTES),
            advance_notice: Duration::hours(DEFAULT_ADVANCE_NOTICE_HOURS),
            hold_duration: Duration::minutes(DEFAULT_HOLD_MINUTES),
            availability_mode: AvailabilityMode::default(),
        }
    }
}

impl SchedulerConfig {
    /// Builder: set slot length.
    pub fn with_slot_length(mut self, slot_length: Duration) -> Self {
        self.slot_length = slot_length;
        self
    }

    /// Builder: set advance notice.
    pub fn with_advance_notice(mut self, advance_notice: Duration) -> Self {
        self.advance_notice = advance_notice;
        self
    }

    /// Builder: set hold duration.
    pub fn with_hold_duration(mut self, hold_duration: Duration) -> Self {
        self.hold_duration = hold_duration;
        self
    }

    /// Builder: set availability mode.
    pub fn with_availability_mode(mut self, mode: AvailabilityMode) -> Self {
        self.availability_mode = mode;
        self
    }

    /// Parse a JSON config document. Missing fields keep their defaults.
    ///
    /// ```json
    /// { "slot_minutes": 20, "advance_notice_minutes": 1440,
    ///   "hold_minutes": 30, "availability_mode": "merge" }
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let file: ConfigFile = serde_json::from_str(json)?;
        file.try_into()
    }
}

/// On-disk shape of [`SchedulerConfig`], with durations in whole minutes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub slot_minutes: Option<i64>,
    pub advance_notice_minutes: Option<i64>,
    pub hold_minutes: Option<i64>,
    pub availability_mode: Option<AvailabilityMode>,
}

impl TryFrom<ConfigFile> for SchedulerConfig {
    type Error = ScheduleError;

    fn try_from(file: ConfigFile) -> Result<Self> {
        let mut config = SchedulerConfig::default();
        if let Some(m) = file.slot_minutes {
            config.slot_length = positive_minutes("slot_minutes", m)?;
        }
        if let Some(m) = file.advance_notice_minutes {
            if m < 0 {
                return Err(ScheduleError::MalformedInput(format!(
                    "advance_notice_minutes must not be negative, got {}",
                    m
                )));
            }
            config.advance_notice = bounded_minutes("advance_notice_minutes", m)?;
        }
        if let Some(m) = file.hold_minutes {
            config.hold_duration = positive_minutes("hold_minutes", m)?;
        }
        if let Some(mode) = file.availability_mode {
            config.availability_mode = mode;
        }
        Ok(config)
    }
}

fn positive_minutes(field: &str, minutes: i64) -> Result<Duration> {
    if minutes <= 0 {
        return Err(ScheduleError::MalformedInput(format!(
            "{} must be positive, got {}",
            field, minutes
        )));
    }
    bounded_minutes(field, minutes)
}

fn bounded_minutes(field: &str, minutes: i64) -> Result<Duration> {
    if minutes > MAX_CONFIG_MINUTES {
        return Err(ScheduleError::MalformedInput(format!(
            "{} must be at most {}, got {}",
            field, MAX_CONFIG_MINUTES, minutes
        )));
    }
    Duration::try_minutes(minutes).ok_or_else(|| {
        ScheduleError::MalformedInput(format!("{} is out of range: {}", field, minutes))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SchedulerConfig::default();
        assert_eq!(config.slot_length, Duration::minutes(15));
        assert_eq!(config.advance_notice, Duration::hours(24));
        assert_eq!(config.hold_duration, Duration::minutes(30));
        assert_eq!(config.availability_mode, AvailabilityMode::Replace);
    }

    #[test]
    fn builder_methods() {
        let config = SchedulerConfig::default()
            .with_slot_length(Duration::minutes(20))
            .with_advance_notice(Duration::hours(2))
            .with_hold_duration(Duration::minutes(5))
            .with_availability_mode(AvailabilityMode::Merge);

        assert_eq!(config.slot_length, Duration::minutes(20));
        assert_eq!(config.advance_notice, Duration::hours(2));
        assert_eq!(config.hold_duration, Duration::minutes(5));
        assert_eq!(config.availability_mode, AvailabilityMode::Merge);
    }

    #[test]
    fn json_overrides_only_given_fields() {
        let config =
            SchedulerConfig::from_json(r#"{"slot_minutes": 30, "availability_mode": "merge"}"#)
                .unwrap();
        assert_eq!(config.slot_length, Duration::minutes(30));
        assert_eq!(config.availability_mode, AvailabilityMode::Merge);
        assert_eq!(config.hold_duration, Duration::minutes(30));
    }

    #[test]
    fn json_rejects_non_positive_slot() {
        let err = SchedulerConfig::from_json(r#"{"slot_minutes": 0}"#).unwrap_err();
        assert!(matches!(err, ScheduleError::MalformedInput(_)));
    }

    #[test]
    fn json_rejects_unknown_fields() {
        assert!(SchedulerConfig::from_json(r#"{"slot_len": 15}"#).is_err());
    }

    #[test]
    fn zero_advance_notice_is_allowed() {
        let config = SchedulerConfig::from_json(r#"{"advance_notice_minutes": 0}"#).unwrap();
        assert_eq!(config.advance_notice, Duration::zero());
    }

    #[test]
    fn json_rejects_minutes_beyond_one_year() {
        for json in [
            r#"{"slot_minutes": 9223372036854775807}"#,
            r#"{"hold_minutes": 100000000000000}"#,
            r#"{"advance_notice_minutes": 527041}"#,
        ] {
            let err = SchedulerConfig::from_json(json).unwrap_err();
            assert!(matches!(err, ScheduleError::MalformedInput(_)), "{}", json);
        }
        let config = SchedulerConfig::from_json(r#"{"hold_minutes": 527040}"#).unwrap();
        assert_eq!(config.hold_duration, Duration::days(366));
    }
}
