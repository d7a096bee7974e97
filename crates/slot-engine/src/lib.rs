//! # slot-engine
//!
//! Scheduling core for provider availability and appointment booking.
//!
//! Providers declare availability windows; the engine cuts them into
//! fixed-length slots, drops the ones taken by appointments that still hold
//! their time, and decides whether a proposed appointment may be booked.
//!
//! ## Modules
//!
//! - [`model`]: availability windows, appointments, slots
//! - [`lifecycle`]: appointment status and its `pending → confirmed` edge
//! - [`overlap`]: policies for when an appointment blocks a slot
//! - [`slicer`]: window → ordered open slots
//! - [`validator`]: advance-notice and availability booking rules
//! - [`store`]: indexed tables behind read/write transactions
//! - [`scheduler`]: the facade the transport layer calls
//! - [`clock`], [`ids`]: injected time source and ID generator
//! - [`config`]: slot length, lead time, hold, availability mode
//! - [`wire`]: request DTOs and timestamp parsing
//! - [`error`]: error types

pub mod clock;
pub mod config;
pub mod error;
pub mod ids;
pub mod lifecycle;
pub mod model;
pub mod overlap;
pub mod scheduler;
pub mod slicer;
pub mod store;
pub mod validator;
pub mod wire;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::SchedulerConfig;
pub use error::{BookingError, ScheduleError};
pub use ids::{IdGenerator, SequentialIds, UuidIds};
pub use lifecycle::AppointmentStatus;
pub use model::{Appointment, AvailabilityWindow, ProviderSlots, Slot};
pub use overlap::{IntervalOverlap, OverlapPolicy, StartInstantOverlap};
pub use scheduler::Scheduler;
pub use slicer::slice;
pub use store::{AvailabilityMode, MemoryStore, ScheduleStore, StoreSnapshot};
pub use validator::{can_book, validate};
