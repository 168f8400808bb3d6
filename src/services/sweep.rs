//! Daily vesting sweeps
//!
//! Two jobs meant to run once a day, never overlapping:
//!
//! - the vesting sweep realizes projected events whose date has arrived and
//!   sends a "vested" notice for each event dated today
//! - the pre-vest sweep sends a reminder for projected events a fixed number
//!   of days ahead
//!
//! Each event is flagged right after its notice is handed off. A crash
//! between the two can repeat one notice on the next run; flagged events are
//! never notified again. A failed dispatch leaves the flag clear so the
//! event is retried, and does not stop the rest of the batch.

use chrono::{Days, NaiveDate};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::settings::VestingSettings;
use crate::error::{PortalError, PortalResult};
use crate::models::NotificationKind;
use crate::notify::{Notifier, VestingNotice};
use crate::storage::{DueEvent, Storage, VestingStore};

/// Outcome of one sweep run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// The date whose events were selected
    pub target_date: Option<NaiveDate>,
    /// Sweep switched off in settings; nothing was read or written
    pub disabled: bool,
    /// Projected events flipped to realized
    pub promoted: usize,
    /// Events selected for notification
    pub considered: usize,
    pub notified: usize,
    /// Dispatch failures, left for the next run
    pub failed: usize,
}

impl SweepReport {
    fn disabled() -> Self {
        Self {
            disabled: true,
            ..Self::default()
        }
    }
}

/// Both sweeps of one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySweepReport {
    pub vesting: SweepReport,
    pub pre_vest: SweepReport,
}

/// Runs the vesting and pre-vest sweeps
pub struct VestingSweep<'a> {
    store: &'a dyn VestingStore,
    notifier: &'a dyn Notifier,
    settings: &'a VestingSettings,
}

impl<'a> VestingSweep<'a> {
    /// Sweep over the default storage
    pub fn new(
        storage: &'a Storage,
        notifier: &'a dyn Notifier,
        settings: &'a VestingSettings,
    ) -> Self {
        Self::with_store(&storage.vesting, notifier, settings)
    }

    pub fn with_store(
        store: &'a dyn VestingStore,
        notifier: &'a dyn Notifier,
        settings: &'a VestingSettings,
    ) -> Self {
        Self {
            store,
            notifier,
            settings,
        }
    }

    /// Realize due events and notify the ones vesting `today`
    pub fn process_vesting_events(&self, today: NaiveDate) -> PortalResult<SweepReport> {
        if !self.settings.enable_auto_vesting {
            debug!("Auto vesting disabled, skipping vesting sweep");
            return Ok(SweepReport::disabled());
        }

        let promoted = self.store.realize_due_events(today)?;
        let due = self
            .store
            .due_for_notification(today, NotificationKind::Vested)?;

        let mut report = self.dispatch(due, NotificationKind::Vested)?;
        report.target_date = Some(today);
        report.promoted = promoted;

        info!(
            date = %today,
            promoted = report.promoted,
            notified = report.notified,
            failed = report.failed,
            "Vesting sweep finished"
        );
        Ok(report)
    }

    /// Remind holders of projected events dated `today + lead_days`
    pub fn process_pre_vest_notifications(
        &self,
        today: NaiveDate,
        lead_days: u32,
    ) -> PortalResult<SweepReport> {
        if !self.settings.enable_pre_vest_notifications {
            debug!("Pre-vest notifications disabled, skipping reminder sweep");
            return Ok(SweepReport::disabled());
        }

        let target = today
            .checked_add_days(Days::new(u64::from(lead_days)))
            .ok_or_else(|| {
                PortalError::InvalidInput(format!(
                    "{} days after {} is out of range",
                    lead_days, today
                ))
            })?;

        let due = self
            .store
            .due_for_notification(target, NotificationKind::PreVest)?;

        let mut report = self.dispatch(due, NotificationKind::PreVest)?;
        report.target_date = Some(target);

        info!(
            date = %target,
            notified = report.notified,
            failed = report.failed,
            "Pre-vest sweep finished"
        );
        Ok(report)
    }

    /// Vesting sweep, then reminders with the configured lead time
    pub fn run_daily(&self, today: NaiveDate) -> PortalResult<DailySweepReport> {
        let vesting = self.process_vesting_events(today)?;
        let pre_vest =
            self.process_pre_vest_notifications(today, self.settings.pre_vest_lead_days)?;
        Ok(DailySweepReport { vesting, pre_vest })
    }

    /// Notify each event and flag it. Dispatch errors are counted and
    /// skipped; flag write errors abort the batch.
    fn dispatch(&self, due: Vec<DueEvent>, kind: NotificationKind) -> PortalResult<SweepReport> {
        let mut report = SweepReport {
            considered: due.len(),
            ..SweepReport::default()
        };

        for DueEvent {
            event,
            shareholder_id,
        } in due
        {
            let notice = VestingNotice {
                shareholder_id,
                grant_id: event.grant_id,
                event_id: event.id,
                units: event.units,
                vesting_date: event.vesting_date,
                kind,
            };

            match self.notifier.notify(&notice) {
                Ok(()) => {
                    self.store.mark_notified(event.id, kind)?;
                    report.notified += 1;
                }
                Err(e) => {
                    warn!(
                        event_id = %event.id,
                        grant_id = %event.grant_id,
                        kind = %kind,
                        error = %e,
                        "Vesting notice failed, will retry next run"
                    );
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }
}
