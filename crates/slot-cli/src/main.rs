//! `slotbook` CLI: manage provider availability and appointment bookings
//! from the command line.
//!
//! State lives in a JSON file (`--state`, default `slotbook.json`) that is
//! loaded before and saved after every command that changes it. Responses
//! are printed to stdout as pretty JSON; logs go to stderr.
//!
//! ## Usage
//!
//! ```sh
//! # Declare availability for a provider
//! slotbook availability --provider dr-grey \
//!     --start 2026-03-03T09:00:00Z --end 2026-03-03T12:00:00Z
//!
//! # List open slots (one provider, or all of them)
//! slotbook slots --provider dr-grey
//! slotbook slots
//!
//! # Book and confirm
//! slotbook book --client alice --provider dr-grey \
//!     --start 2026-03-03T09:15:00Z --end 2026-03-03T09:30:00Z
//! slotbook confirm --id <appointment-id>
//!
//! # Pin the clock for reproducible runs
//! slotbook --now 2026-03-02T08:00:00Z slots
//! ```

mod logging;
mod state;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use slot_engine::wire::{self, AppointmentRequest, AvailabilityRequest};
use slot_engine::{
    AvailabilityMode, Clock, FixedClock, MemoryStore, Scheduler, SchedulerConfig, SystemClock,
    UuidIds,
};

#[derive(Parser)]
#[command(
    name = "slotbook",
    version,
    about = "Provider availability and appointment booking"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// State file (created on first write)
    #[arg(long, global = true, default_value = "slotbook.json")]
    state: PathBuf,

    /// JSON scheduler config (slot_minutes, advance_notice_minutes, hold_minutes, availability_mode)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use this instant as "now" instead of the system clock (RFC 3339)
    #[arg(long, global = true)]
    now: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Declare an availability window for a provider
    Availability {
        #[arg(long)]
        provider: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        /// Merge with existing windows instead of replacing them
        #[arg(long)]
        merge: bool,
    },
    /// List open slots
    Slots {
        /// Only this provider (all providers if omitted)
        #[arg(long)]
        provider: Option<String>,
    },
    /// Request an appointment; it stays pending until confirmed
    Book {
        #[arg(long)]
        client: String,
        #[arg(long)]
        provider: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },
    /// Confirm a pending appointment
    Confirm {
        #[arg(long)]
        id: String,
    },
    /// List a client's appointments
    Appointments {
        #[arg(long)]
        client: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let mut config = load_config(cli.config.as_deref())?;
    if matches!(cli.command, Commands::Availability { merge: true, .. }) {
        config = config.with_availability_mode(AvailabilityMode::Merge);
    }

    let clock: Arc<dyn Clock> = match cli.now.as_deref() {
        Some(now) => Arc::new(FixedClock::new(
            wire::parse_timestamp(now).context("Invalid --now")?,
        )),
        None => Arc::new(SystemClock),
    };

    let store = Arc::new(state::load(&cli.state)?);
    let scheduler = Scheduler::new(store.clone(), clock, Arc::new(UuidIds), config);

    let (response, changed) = run(&scheduler, cli.command)?;

    if changed {
        state::save(&cli.state, &store)?;
    }
    println!("{}", wire::to_json(&response)?);
    Ok(())
}

/// Execute one command. Returns the response and whether state changed.
fn run(scheduler: &Scheduler<MemoryStore>, command: Commands) -> Result<(Value, bool)> {
    match command {
        Commands::Availability {
            provider,
            start,
            end,
            ..
        } => {
            let window = AvailabilityRequest { start, end }
                .into_window(&provider)
                .context("Invalid availability window")?;
            let windows = scheduler
                .set_availability(&window.provider_id, window.start, window.end)
                .context("Failed to save availability")?;
            Ok((serde_json::to_value(windows)?, true))
        }
        Commands::Slots { provider: Some(provider) } => {
            let slots = scheduler
                .compute_open_slots(&provider)
                .with_context(|| format!("Failed to list slots for {}", provider))?;
            Ok((serde_json::to_value(slots)?, false))
        }
        Commands::Slots { provider: None } => {
            let all = scheduler.all_open_slots().context("Failed to list slots")?;
            Ok((serde_json::to_value(all)?, false))
        }
        Commands::Book {
            client,
            provider,
            start,
            end,
        } => {
            let request = AppointmentRequest {
                provider_id: provider,
                start,
                end,
            }
            .decode()
            .context("Invalid appointment request")?;
            let appointment = scheduler
                .submit_appointment(&client, &request.provider_id, request.start, request.end)
                .context("Failed to book appointment")?;
            Ok((serde_json::to_value(appointment)?, true))
        }
        Commands::Confirm { id } => {
            let appointment = scheduler
                .confirm_appointment(&id)
                .context("Failed to confirm appointment")?;
            Ok((serde_json::to_value(appointment)?, true))
        }
        Commands::Appointments { client } => {
            let appointments = scheduler.appointments_for_client(&client);
            Ok((serde_json::to_value(appointments)?, false))
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<SchedulerConfig> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            SchedulerConfig::from_json(&json)
                .with_context(|| format!("Invalid config file: {}", path.display()))
        }
        None => Ok(SchedulerConfig::default()),
    }
}
