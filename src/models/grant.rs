//! RSU grant model
//!
//! A grant is immutable after creation apart from its lifecycle status. The
//! vesting parameters live in [`VestingTerms`], which is also what the
//! schedule calculator consumes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{GrantId, ShareClassId, ShareholderId};
use super::units::Units;
use crate::error::PortalError;

/// How often units vest after the cliff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VestingFrequency {
    #[default]
    Monthly,
    Quarterly,
    Annually,
}

impl VestingFrequency {
    /// Length of one vesting interval in months
    pub const fn interval_months(&self) -> u32 {
        match self {
            Self::Monthly => 1,
            Self::Quarterly => 3,
            Self::Annually => 12,
        }
    }

    /// All frequencies, in display order
    pub fn all() -> &'static [VestingFrequency] {
        &[Self::Monthly, Self::Quarterly, Self::Annually]
    }
}

impl fmt::Display for VestingFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Monthly => write!(f, "monthly"),
            Self::Quarterly => write!(f, "quarterly"),
            Self::Annually => write!(f, "annually"),
        }
    }
}

impl FromStr for VestingFrequency {
    type Err = PortalError;

    /// Unknown frequencies are rejected rather than treated as monthly
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "annually" | "annual" | "yearly" => Ok(Self::Annually),
            other => Err(PortalError::InvalidConfiguration(format!(
                "Unrecognized vesting frequency '{}'. Valid values: monthly, quarterly, annually",
                other
            ))),
        }
    }
}

/// Lifecycle status of a grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GrantStatus {
    #[default]
    Active,
    Cancelled,
}

impl fmt::Display for GrantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// The parameters that fully determine a vesting schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingTerms {
    pub grant_date: NaiveDate,
    pub vesting_start_date: NaiveDate,
    pub total_units: Units,
    pub cliff_months: u32,
    pub duration_months: u32,
    pub frequency: VestingFrequency,
}

impl VestingTerms {
    /// Number of vesting intervals that fit in the duration
    pub fn event_count(&self) -> u32 {
        self.duration_months / self.frequency.interval_months()
    }

    /// Check the terms can produce a schedule that vests every unit
    pub fn validate(&self) -> Result<(), GrantValidationError> {
        if !self.total_units.is_positive() {
            return Err(GrantValidationError::NonPositiveUnits);
        }

        if self.duration_months <= self.cliff_months {
            return Err(GrantValidationError::CliffNotBeforeEnd {
                cliff_months: self.cliff_months,
                duration_months: self.duration_months,
            });
        }

        let count = self.event_count();
        if count == 0 {
            return Err(GrantValidationError::DurationShorterThanInterval {
                duration_months: self.duration_months,
                frequency: self.frequency,
            });
        }

        let per_event = self.total_units.share_of(count).unwrap_or_default();
        if per_event.is_zero() {
            return Err(GrantValidationError::ShareBelowPrecision {
                total_units: self.total_units,
                events: count,
            });
        }

        let last_offset = count * self.frequency.interval_months();
        if last_offset < self.cliff_months {
            return Err(GrantValidationError::CliffAfterLastEvent {
                cliff_months: self.cliff_months,
                last_offset,
            });
        }

        Ok(())
    }
}

/// Validation errors for grant terms
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrantValidationError {
    NonPositiveUnits,
    CliffNotBeforeEnd {
        cliff_months: u32,
        duration_months: u32,
    },
    DurationShorterThanInterval {
        duration_months: u32,
        frequency: VestingFrequency,
    },
    CliffAfterLastEvent {
        cliff_months: u32,
        last_offset: u32,
    },
    /// Each event's share truncates to zero units
    ShareBelowPrecision {
        total_units: Units,
        events: u32,
    },
    MissingCancellationReason,
}

impl fmt::Display for GrantValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveUnits => write!(f, "Total units must be positive"),
            Self::CliffNotBeforeEnd {
                cliff_months,
                duration_months,
            } => write!(
                f,
                "Vesting duration ({} months) must be longer than the cliff ({} months)",
                duration_months, cliff_months
            ),
            Self::DurationShorterThanInterval {
                duration_months,
                frequency,
            } => write!(
                f,
                "A {} month duration produces no {} vesting events",
                duration_months, frequency
            ),
            Self::CliffAfterLastEvent {
                cliff_months,
                last_offset,
            } => write!(
                f,
                "Cliff of {} months falls after the last vesting event at month {}",
                cliff_months, last_offset
            ),
            Self::ShareBelowPrecision {
                total_units,
                events,
            } => write!(
                f,
                "{} units split over {} vesting events is less than {} per event",
                total_units,
                events,
                Units::smallest()
            ),
            Self::MissingCancellationReason => write!(f, "A cancellation reason is required"),
        }
    }
}

impl std::error::Error for GrantValidationError {}

impl From<GrantValidationError> for PortalError {
    fn from(err: GrantValidationError) -> Self {
        PortalError::InvalidInput(err.to_string())
    }
}

/// An RSU grant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grant {
    /// Unique identifier
    pub id: GrantId,

    /// Shareholder receiving the units
    pub shareholder_id: ShareholderId,

    /// Share class the units convert into
    pub share_class_id: ShareClassId,

    /// Vesting parameters
    #[serde(flatten)]
    pub terms: VestingTerms,

    #[serde(default)]
    pub status: GrantStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancellation_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,

    /// Path to the signed grant agreement, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grant_document_path: Option<String>,

    #[serde(default)]
    pub notes: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Grant {
    /// Create a new active grant
    pub fn new(
        shareholder_id: ShareholderId,
        share_class_id: ShareClassId,
        terms: VestingTerms,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: GrantId::new(),
            shareholder_id,
            share_class_id,
            terms,
            status: GrantStatus::Active,
            cancellation_date: None,
            cancellation_reason: None,
            grant_document_path: None,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == GrantStatus::Active
    }

    /// Move the grant to cancelled; events are left untouched
    pub fn cancel(&mut self, on: NaiveDate, reason: impl Into<String>) -> Result<(), GrantValidationError> {
        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(GrantValidationError::MissingCancellationReason);
        }
        self.status = GrantStatus::Cancelled;
        self.cancellation_date = Some(on);
        self.cancellation_reason = Some(reason.trim().to_string());
        self.updated_at = Utc::now();
        Ok(())
    }
}

impl fmt::Display for Grant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} units ({}, {} month cliff, {} months)",
            self.terms.total_units,
            self.terms.frequency,
            self.terms.cliff_months,
            self.terms.duration_months
        )
    }
}
