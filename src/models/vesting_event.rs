//! Vesting event model
//!
//! One row per scheduled vesting date of a grant. Rows are written once when
//! the grant is created; afterwards only the projected flag and the two
//! notification flags change, and only in one direction.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{GrantId, VestingEventId};
use super::units::Units;

/// Which notification flag a dispatch concerns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Units vested today
    Vested,
    /// Reminder ahead of an upcoming vesting date
    PreVest,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vested => write!(f, "vested"),
            Self::PreVest => write!(f, "pre-vest"),
        }
    }
}

/// A stored vesting event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VestingEvent {
    pub id: VestingEventId,

    /// Owning grant
    pub grant_id: GrantId,

    pub vesting_date: NaiveDate,

    pub units: Units,

    /// Date was in the future when last evaluated
    pub is_projected: bool,

    #[serde(default)]
    pub notification_sent: bool,

    #[serde(default)]
    pub pre_vest_notification_sent: bool,
}

impl VestingEvent {
    /// Create an event with both notification flags cleared
    pub fn new(grant_id: GrantId, vesting_date: NaiveDate, units: Units, is_projected: bool) -> Self {
        Self {
            id: VestingEventId::new(),
            grant_id,
            vesting_date,
            units,
            is_projected,
            notification_sent: false,
            pre_vest_notification_sent: false,
        }
    }

    /// Whether the notification of the given kind has gone out
    pub fn is_notified(&self, kind: NotificationKind) -> bool {
        match kind {
            NotificationKind::Vested => self.notification_sent,
            NotificationKind::PreVest => self.pre_vest_notification_sent,
        }
    }

    /// Set a notification flag. Flags never go back to false.
    pub fn mark_notified(&mut self, kind: NotificationKind) {
        match kind {
            NotificationKind::Vested => self.notification_sent = true,
            NotificationKind::PreVest => self.pre_vest_notification_sent = true,
        }
    }

    /// Flip projected to realized once the date has arrived
    ///
    /// Returns true if the flag changed.
    pub fn realize_if_due(&mut self, today: NaiveDate) -> bool {
        if self.is_projected && self.vesting_date <= today {
            self.is_projected = false;
            true
        } else {
            false
        }
    }
}
