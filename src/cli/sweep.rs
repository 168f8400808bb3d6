//! Sweep CLI commands
//!
//! Meant to be run once a day from cron or a systemd timer.

use clap::Subcommand;

use super::parse_date_or;
use crate::clock::Clock;
use crate::config::settings::Settings;
use crate::display::format_sweep_report;
use crate::error::PortalResult;
use crate::notify::OutboxNotifier;
use crate::services::VestingSweep;
use crate::storage::Storage;

/// Sweep subcommands
#[derive(Subcommand)]
pub enum SweepCommands {
    /// Realize due events and send vested notices
    Vesting {
        /// Run as of this date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Send reminders ahead of upcoming vesting dates
    PreVest {
        #[arg(long)]
        date: Option<String>,
        /// Days ahead (default from settings)
        #[arg(long)]
        lead_days: Option<u32>,
    },
    /// Both sweeps
    Daily {
        #[arg(long)]
        date: Option<String>,
    },
}

/// Handle a sweep command
pub fn handle_sweep_command(
    storage: &Storage,
    settings: &Settings,
    clock: &dyn Clock,
    cmd: SweepCommands,
) -> PortalResult<()> {
    let notifier = OutboxNotifier::new(storage.paths().outbox_file());
    let sweep = VestingSweep::new(storage, &notifier, &settings.vesting);
    let today = clock.today();

    match cmd {
        SweepCommands::Vesting { date } => {
            let date = parse_date_or(date.as_deref(), today)?;
            let report = sweep.process_vesting_events(date)?;
            print!("{}", format_sweep_report("Vesting", &report));
        }

        SweepCommands::PreVest { date, lead_days } => {
            let date = parse_date_or(date.as_deref(), today)?;
            let lead_days = lead_days.unwrap_or(settings.vesting.pre_vest_lead_days);
            let report = sweep.process_pre_vest_notifications(date, lead_days)?;
            print!("{}", format_sweep_report("Pre-vest", &report));
        }

        SweepCommands::Daily { date } => {
            let date = parse_date_or(date.as_deref(), today)?;
            let daily = sweep.run_daily(date)?;
            print!("{}", format_sweep_report("Vesting", &daily.vesting));
            print!("{}", format_sweep_report("Pre-vest", &daily.pre_vest));
        }
    }

    Ok(())
}
