//! The scheduling facade: composes the store, the slicer and the validator
//! behind the operations a transport layer calls.
//!
//! Every operation samples the clock once. Booking and confirmation each run
//! inside a single exclusive store transaction, so the availability check and
//! the insert (or the lookup and the update) cannot interleave with another
//! writer.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::config::SchedulerConfig;
use crate::error::{Result, ScheduleError};
use crate::ids::IdGenerator;
use crate::model::{Appointment, AvailabilityWindow, ProviderSlots, Slot};
use crate::overlap::{blocking_at, OverlapPolicy, StartInstantOverlap};
use crate::slicer::slice_all;
use crate::store::{ScheduleStore, ScheduleTables};
use crate::validator::validate_with_notice;

type SharedPolicy = Box<dyn OverlapPolicy + Send + Sync>;

pub struct Scheduler<S: ScheduleStore> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    config: SchedulerConfig,
    overlap: SharedPolicy,
}

impl<S: ScheduleStore> Scheduler<S> {
    pub fn new(
        store: Arc<S>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            store,
            clock,
            ids,
            config,
            overlap: Box::new(StartInstantOverlap),
        }
    }

    /// Builder: replace the default [`StartInstantOverlap`] policy.
    pub fn with_overlap_policy(
        mut self,
        policy: impl OverlapPolicy + Send + Sync + 'static,
    ) -> Self {
        self.overlap = Box::new(policy);
        self
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Record a provider's availability and return its resulting window set.
    ///
    /// Depending on [`SchedulerConfig::availability_mode`] the window either
    /// replaces the provider's existing windows or is merged into them.
    pub fn set_availability(
        &self,
        provider_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<AvailabilityWindow>> {
        let window = AvailabilityWindow::new(provider_id, start, end)?;
        let mode = self.config.availability_mode;
        let windows = self
            .store
            .write(|t| t.put_availability(window, mode).map(<[_]>::to_vec))?;
        info!(
            provider_id = %provider_id,
            start = %start,
            end = %end,
            mode = ?mode,
            windows = windows.len(),
            "Saved availability"
        );
        Ok(windows)
    }

    /// Open slots of one provider at the current instant.
    ///
    /// Fails with `NotFound` if the provider never declared availability.
    pub fn compute_open_slots(&self, provider_id: &str) -> Result<Vec<Slot>> {
        let now = self.clock.now();
        self.store.read(|t| self.open_slots(t, provider_id, now))
    }

    /// Open slots of every provider with availability, ordered by provider ID.
    pub fn all_open_slots(&self) -> Result<Vec<ProviderSlots>> {
        let now = self.clock.now();
        self.store.read(|t| {
            t.providers()
                .map(|provider_id| -> Result<ProviderSlots> {
                    Ok(ProviderSlots {
                        provider_id: provider_id.to_string(),
                        slots: self.open_slots(t, provider_id, now)?,
                    })
                })
                .collect::<Result<Vec<_>>>()
        })
    }

    /// Create a pending appointment if the booking rules admit it.
    ///
    /// A provider without any availability is reported as unavailable rather
    /// than missing.
    pub fn submit_appointment(
        &self,
        client_id: &str,
        provider_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Appointment> {
        let now = self.clock.now();
        let proposed = Appointment::pending(
            self.ids.next_id(),
            client_id,
            provider_id,
            start,
            end,
            now,
            self.config.hold_duration,
        )?;

        self.store.write(|t| -> Result<Appointment> {
            let slots = match self.open_slots(t, provider_id, now) {
                Ok(slots) => slots,
                Err(ScheduleError::NotFound { .. }) => Vec::new(),
                Err(err) => return Err(err),
            };

            let verdict = validate_with_notice(&proposed, &slots, now, self.config.advance_notice);
            if let Err(err) = verdict {
                warn!(
                    client_id = %client_id,
                    provider_id = %provider_id,
                    start = %start,
                    error = %err,
                    "Rejected appointment"
                );
                return Err(err.into());
            }

            t.put_appointment(proposed.clone())?;
            info!(
                appointment_id = %proposed.id,
                client_id = %client_id,
                provider_id = %provider_id,
                start = %start,
                expires = %proposed.expires,
                "Booked pending appointment"
            );
            Ok(proposed)
        })
    }

    /// Confirm an appointment. Confirming twice succeeds without change.
    pub fn confirm_appointment(&self, appointment_id: &str) -> Result<Appointment> {
        self.store.write(|t| -> Result<Appointment> {
            let mut appointment = t.appointment(appointment_id)?.clone();
            if appointment.confirm() {
                t.put_appointment(appointment.clone())?;
                info!(appointment_id = %appointment_id, "Confirmed appointment");
            } else {
                debug!(appointment_id = %appointment_id, "Appointment already confirmed");
            }
            Ok(appointment)
        })
    }

    pub fn appointment(&self, appointment_id: &str) -> Result<Appointment> {
        self.store.read(|t| t.appointment(appointment_id).cloned())
    }

    pub fn appointments_for_client(&self, client_id: &str) -> Vec<Appointment> {
        self.store.read(|t| t.appointments_for_client(client_id))
    }

    pub fn appointments_for_provider(&self, provider_id: &str) -> Vec<Appointment> {
        self.store.read(|t| t.appointments_for_provider(provider_id))
    }

    /// Pending appointments whose hold has run out. They stay `pending`.
    pub fn lapsed_appointments(&self, provider_id: &str) -> Vec<Appointment> {
        let now = self.clock.now();
        self.store.read(|t| {
            t.appointments_for_provider(provider_id)
                .into_iter()
                .filter(|a| a.is_lapsed(now))
                .collect()
        })
    }

    fn open_slots(
        &self,
        tables: &ScheduleTables,
        provider_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Slot>> {
        let windows = tables.availability(provider_id)?;
        let blocking = blocking_at(&tables.appointments_for_provider(provider_id), now);
        let slots = slice_all(
            self.overlap.as_ref(),
            windows,
            &blocking,
            self.config.slot_length,
        );
        debug!(
            provider_id = %provider_id,
            windows = windows.len(),
            blocking = blocking.len(),
            open = slots.len(),
            "Sliced availability"
        );
        Ok(slots)
    }
}
