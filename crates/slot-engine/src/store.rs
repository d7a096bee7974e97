//! Indexed in-memory storage for availability windows and appointments.
//!
//! [`ScheduleTables`] holds the rows and their secondary indexes;
//! [`ScheduleStore`] wraps it in read (shared) and write (exclusive)
//! transactions. A multi-step operation that must not interleave with other
//! writers runs its whole body inside one [`ScheduleStore::write`] call.

use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::model::{check_interval, Appointment, AvailabilityWindow};

/// What happens to a provider's existing windows when a new one arrives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityMode {
    /// The new window replaces every existing window of the provider.
    #[default]
    Replace,
    /// The new window is added and overlapping or adjacent windows coalesce.
    Merge,
}

/// Row storage plus provider and client indexes over appointments.
#[derive(Debug, Default)]
pub struct ScheduleTables {
    /// Per provider, sorted by start and non-overlapping.
    availability: BTreeMap<String, Vec<AvailabilityWindow>>,
    appointments: HashMap<String, Appointment>,
    by_provider: HashMap<String, Vec<String>>,
    by_client: HashMap<String, Vec<String>>,
}

impl ScheduleTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// The provider's windows, or `NotFound` if it never declared any.
    pub fn availability(&self, provider_id: &str) -> Result<&[AvailabilityWindow]> {
        self.availability
            .get(provider_id)
            .map(Vec::as_slice)
            .ok_or_else(|| ScheduleError::availability_not_found(provider_id))
    }

    /// Providers with at least one window, in ascending ID order.
    pub fn providers(&self) -> impl Iterator<Item = &str> {
        self.availability.keys().map(String::as_str)
    }

    /// Store a window and return the provider's resulting window set.
    pub fn put_availability(
        &mut self,
        window: AvailabilityWindow,
        mode: AvailabilityMode,
    ) -> Result<&[AvailabilityWindow]> {
        check_interval(window.start, window.end)?;
        let provider_id = window.provider_id.clone();
        let windows = self.availability.entry(provider_id).or_default();
        match mode {
            AvailabilityMode::Replace => {
                windows.clear();
                windows.push(window);
            }
            AvailabilityMode::Merge => {
                windows.push(window);
                *windows = coalesce(std::mem::take(windows));
            }
        }
        Ok(windows.as_slice())
    }

    pub fn appointment(&self, appointment_id: &str) -> Result<&Appointment> {
        self.appointments
            .get(appointment_id)
            .ok_or_else(|| ScheduleError::appointment_not_found(appointment_id))
    }

    /// Every appointment of the provider, ordered by start.
    pub fn appointments_for_provider(&self, provider_id: &str) -> Vec<Appointment> {
        self.indexed(&self.by_provider, provider_id)
    }

    /// Every appointment of the client, ordered by start.
    pub fn appointments_for_client(&self, client_id: &str) -> Vec<Appointment> {
        self.indexed(&self.by_client, client_id)
    }

    /// Insert or replace by ID, keeping both indexes in step.
    pub fn put_appointment(&mut self, appointment: Appointment) -> Result<()> {
        check_interval(appointment.start, appointment.end)?;
        if let Some(previous) = self.appointments.remove(&appointment.id) {
            unindex(&mut self.by_provider, &previous.provider_id, &previous.id);
            unindex(&mut self.by_client, &previous.client_id, &previous.id);
        }
        self.by_provider
            .entry(appointment.provider_id.clone())
            .or_default()
            .push(appointment.id.clone());
        self.by_client
            .entry(appointment.client_id.clone())
            .or_default()
            .push(appointment.id.clone());
        self.appointments.insert(appointment.id.clone(), appointment);
        Ok(())
    }

    pub fn appointment_count(&self) -> usize {
        self.appointments.len()
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        let availability = self.availability.values().flatten().cloned().collect();
        let mut appointments: Vec<Appointment> = self.appointments.values().cloned().collect();
        appointments.sort_by(|a, b| (a.start, &a.id).cmp(&(b.start, &b.id)));
        StoreSnapshot {
            availability,
            appointments,
        }
    }

    /// Rebuild tables and indexes from a snapshot. Windows of the same
    /// provider are coalesced.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Result<Self> {
        let mut tables = Self::new();
        for window in snapshot.availability {
            tables.put_availability(window, AvailabilityMode::Merge)?;
        }
        for appointment in snapshot.appointments {
            tables.put_appointment(appointment)?;
        }
        Ok(tables)
    }

    fn indexed(&self, index: &HashMap<String, Vec<String>>, key: &str) -> Vec<Appointment> {
        let mut found: Vec<Appointment> = index
            .get(key)
            .into_iter()
            .flatten()
            // An index entry without a row means the tables are corrupt.
            .map(|id| self.appointments[id].clone())
            .collect();
        found.sort_by(|a, b| (a.start, &a.id).cmp(&(b.start, &b.id)));
        found
    }
}

fn unindex(index: &mut HashMap<String, Vec<String>>, key: &str, id: &str) {
    if let Some(ids) = index.get_mut(key) {
        ids.retain(|existing| existing != id);
        if ids.is_empty() {
            index.remove(key);
        }
    }
}

/// Sort windows and merge the ones that overlap or touch.
fn coalesce(mut windows: Vec<AvailabilityWindow>) -> Vec<AvailabilityWindow> {
    windows.sort_by_key(|w| (w.start, w.end));

    let mut merged: Vec<AvailabilityWindow> = Vec::with_capacity(windows.len());
    for window in windows {
        if let Some(last) = merged.last_mut() {
            if last.touches(&window) {
                last.end = last.end.max(window.end);
                continue;
            }
        }
        merged.push(window);
    }
    merged
}

/// Serializable copy of every row, used to persist and restore a store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub availability: Vec<AvailabilityWindow>,
    #[serde(default)]
    pub appointments: Vec<Appointment>,
}

/// Transactional access to [`ScheduleTables`].
pub trait ScheduleStore: Send + Sync {
    /// Run `f` against a shared snapshot. Readers may run concurrently.
    fn read<R>(&self, f: impl FnOnce(&ScheduleTables) -> R) -> R;

    /// Run `f` with exclusive access. Nothing else reads or writes meanwhile.
    fn write<R>(&self, f: impl FnOnce(&mut ScheduleTables) -> R) -> R;
}

/// Process-local store behind a reader-writer lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<ScheduleTables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Result<Self> {
        Ok(Self {
            tables: RwLock::new(ScheduleTables::from_snapshot(snapshot)?),
        })
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.read(ScheduleTables::snapshot)
    }
}

impl ScheduleStore for MemoryStore {
    fn read<R>(&self, f: impl FnOnce(&ScheduleTables) -> R) -> R {
        let guard = self.tables.read();
        f(&*guard)
    }

    fn write<R>(&self, f: impl FnOnce(&mut ScheduleTables) -> R) -> R {
        let mut guard = self.tables.write();
        f(&mut *guard)
    }
}
