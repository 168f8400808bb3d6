//! Grant CLI commands

use clap::Subcommand;

use super::{parse_date, parse_date_or, resolve_grant};
use crate::clock::Clock;
use crate::display::{format_grant_details, format_grant_list, format_schedule, format_summary};
use crate::error::{PortalError, PortalResult};
use crate::models::{
    GrantId, Role, ShareClassId, ShareholderId, Units, VestingEvent, VestingFrequency,
    VestingTerms,
};
use crate::services::{GrantService, NewGrant};
use crate::storage::Storage;
use crate::vesting::compute_schedule;

/// Grant subcommands
#[derive(Subcommand)]
pub enum GrantCommands {
    /// Create a grant and store its vesting schedule
    Create {
        /// Shareholder ID (UUID)
        #[arg(long)]
        shareholder: String,
        /// Share class ID (UUID)
        #[arg(long)]
        share_class: String,
        /// Total units granted (e.g. "4800" or "1000.5")
        #[arg(short, long)]
        units: String,
        /// Cliff in months
        #[arg(long, default_value_t = 12)]
        cliff: u32,
        /// Vesting duration in months
        #[arg(long, default_value_t = 48)]
        duration: u32,
        /// Vesting frequency (monthly, quarterly, annually)
        #[arg(short, long, default_value = "monthly")]
        frequency: String,
        /// Grant date (YYYY-MM-DD, default today)
        #[arg(long)]
        grant_date: Option<String>,
        /// Vesting start date (YYYY-MM-DD, default grant date)
        #[arg(long)]
        start: Option<String>,
        /// Path of the signed grant agreement
        #[arg(long)]
        document: Option<String>,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
        /// Date used to classify events as vested or projected
        #[arg(long)]
        today: Option<String>,
    },
    /// Show a schedule without storing anything
    Preview {
        #[arg(short, long)]
        units: String,
        #[arg(long, default_value_t = 12)]
        cliff: u32,
        #[arg(long, default_value_t = 48)]
        duration: u32,
        #[arg(short, long, default_value = "monthly")]
        frequency: String,
        /// Vesting start date (YYYY-MM-DD)
        #[arg(long)]
        start: String,
        #[arg(long)]
        today: Option<String>,
    },
    /// List grants, optionally for one shareholder
    List {
        #[arg(long)]
        shareholder: Option<String>,
    },
    /// Show a grant and its schedule
    Show {
        /// Grant ID
        grant: String,
    },
    /// Cancel an active grant
    Cancel {
        /// Grant ID
        grant: String,
        /// Reason recorded with the cancellation
        #[arg(short, long)]
        reason: String,
        /// Cancellation date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Vesting totals for a shareholder
    Summary {
        /// Shareholder ID (UUID)
        shareholder: String,
    },
}

fn parse_shareholder(value: &str) -> PortalResult<ShareholderId> {
    value.trim().parse().map_err(|_| {
        PortalError::InvalidInput(format!("Invalid shareholder ID: '{}'", value))
    })
}

fn parse_share_class(value: &str) -> PortalResult<ShareClassId> {
    value.trim().parse().map_err(|_| {
        PortalError::InvalidInput(format!("Invalid share class ID: '{}'", value))
    })
}

/// Handle a grant command
///
/// Dates left off the command line default to `clock.today()`.
pub fn handle_grant_command(
    storage: &Storage,
    clock: &dyn Clock,
    role: Role,
    cmd: GrantCommands,
) -> PortalResult<()> {
    let service = GrantService::new(storage);

    match cmd {
        GrantCommands::Create {
            shareholder,
            share_class,
            units,
            cliff,
            duration,
            frequency,
            grant_date,
            start,
            document,
            notes,
            today,
        } => {
            let today = parse_date_or(today.as_deref(), clock.today())?;
            let grant_date = parse_date_or(grant_date.as_deref(), today)?;
            let vesting_start_date = parse_date_or(start.as_deref(), grant_date)?;

            let params = NewGrant {
                shareholder_id: parse_shareholder(&shareholder)?,
                share_class_id: parse_share_class(&share_class)?,
                grant_date,
                vesting_start_date,
                total_units: Units::parse(&units)?,
                cliff_months: cliff,
                duration_months: duration,
                frequency: frequency.parse::<VestingFrequency>()?,
                grant_document_path: document,
                notes: notes.unwrap_or_default(),
            };

            let grant = service.create_grant(role, params, today)?;
            let schedule = service.grant_schedule(grant.id)?;

            println!("Created grant: {}", grant.id.as_uuid());
            println!("  {}", grant);
            println!("  Vesting events: {}", schedule.len());
            if let Some(first) = schedule.first() {
                println!("  First vesting: {} units on {}", first.units, first.vesting_date);
            }
        }

        GrantCommands::Preview {
            units,
            cliff,
            duration,
            frequency,
            start,
            today,
        } => {
            let start = parse_date(&start)?;
            let terms = VestingTerms {
                grant_date: start,
                vesting_start_date: start,
                total_units: Units::parse(&units)?,
                cliff_months: cliff,
                duration_months: duration,
                frequency: frequency.parse()?,
            };
            terms.validate()?;

            let reference = parse_date_or(today.as_deref(), clock.today())?;
            let preview_id = GrantId::new();
            let events: Vec<_> = compute_schedule(&terms, reference)?
                .into_iter()
                .map(|s| VestingEvent::new(preview_id, s.vesting_date, s.units, s.is_projected))
                .collect();
            print!("{}", format_schedule(&events));
        }

        GrantCommands::List { shareholder } => {
            let grants = match shareholder {
                Some(s) => service.grants_for_shareholder(parse_shareholder(&s)?)?,
                None => storage.vesting.all_grants()?,
            };
            print!("{}", format_grant_list(&grants));
        }

        GrantCommands::Show { grant } => {
            let id = resolve_grant(storage, &grant)?;
            let found = service
                .get(id)?
                .ok_or_else(|| PortalError::grant_not_found(&grant))?;

            print!("{}", format_grant_details(&found));
            println!();
            print!("{}", format_schedule(&service.grant_schedule(id)?));
        }

        GrantCommands::Cancel {
            grant,
            reason,
            date,
        } => {
            let id = resolve_grant(storage, &grant)?;
            let on = parse_date_or(date.as_deref(), clock.today())?;
            let cancelled = service.cancel_grant(role, id, &reason, on)?;
            println!("Cancelled grant: {}", cancelled.id.as_uuid());
        }

        GrantCommands::Summary { shareholder } => {
            let summary = service.vesting_summary(parse_shareholder(&shareholder)?)?;
            print!("{}", format_summary(&summary));
        }
    }

    Ok(())
}
