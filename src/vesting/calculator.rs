//! Vesting schedule calculation
//!
//! Turns [`VestingTerms`] into the ordered list of dated unit amounts. The
//! function is pure: the only input besides the terms is the reference date
//! used to classify events as projected or realized.
//!
//! Rules:
//!
//! - one event per frequency interval that fits in the duration
//!   (`duration / interval`, rounded down)
//! - events whose month offset falls strictly before the cliff are not
//!   emitted; the first event at or after the cliff carries their units on
//!   top of its own
//! - dates are `vesting_start + offset` months, clamped to month end
//! - the last event takes the rounding remainder, so the amounts always sum
//!   to the grant total exactly

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{PortalError, PortalResult};
use crate::models::{Units, VestingTerms};

/// One computed vesting date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledVesting {
    pub vesting_date: NaiveDate,
    pub units: Units,
    /// Date is strictly after the reference date
    pub is_projected: bool,
}

/// Compute the full vesting schedule for a set of terms
///
/// Returns an empty schedule when the duration is shorter than one interval.
///
/// # Errors
///
/// `InvalidInput` when the total is not positive, when a share truncates to
/// zero units, when the cliff lies after every vesting date, or when a date
/// falls outside the calendar range.
pub fn compute_schedule(
    terms: &VestingTerms,
    reference_date: NaiveDate,
) -> PortalResult<Vec<ScheduledVesting>> {
    let interval = terms.frequency.interval_months();
    let event_count = terms.event_count();

    if event_count == 0 {
        return Ok(Vec::new());
    }

    if !terms.total_units.is_positive() {
        return Err(PortalError::InvalidInput(
            "Total units must be positive".into(),
        ));
    }

    let per_event = terms
        .total_units
        .share_of(event_count)
        .ok_or_else(|| PortalError::InvalidInput("Schedule has no vesting events".into()))?;
    if per_event.is_zero() {
        return Err(PortalError::InvalidInput(format!(
            "{} units over {} events is below {} per event",
            terms.total_units,
            event_count,
            Units::smallest()
        )));
    }

    let mut schedule: Vec<ScheduledVesting> = Vec::with_capacity(event_count as usize);
    let mut suppressed = 0u32;

    for index in 0..event_count {
        let offset = (index + 1) * interval;
        if offset < terms.cliff_months {
            suppressed += 1;
            continue;
        }

        // First emitted event is the cliff catch-up
        let shares = if schedule.is_empty() { suppressed + 1 } else { 1 };

        let vesting_date = terms
            .vesting_start_date
            .checked_add_months(Months::new(offset))
            .ok_or_else(|| {
                PortalError::InvalidInput(format!(
                    "Vesting date {} months after {} is out of range",
                    offset, terms.vesting_start_date
                ))
            })?;

        schedule.push(ScheduledVesting {
            vesting_date,
            units: per_event * shares,
            is_projected: vesting_date > reference_date,
        });
    }

    let Some((last, earlier)) = schedule.split_last_mut() else {
        return Err(PortalError::InvalidInput(format!(
            "Cliff of {} months falls after the last vesting event",
            terms.cliff_months
        )));
    };
    let allocated: Units = earlier.iter().map(|e| e.units).sum();
    last.units = terms.total_units - allocated;

    Ok(schedule)
}

/// Sum of units across a schedule
pub fn total_units(schedule: &[ScheduledVesting]) -> Units {
    schedule.iter().map(|e| e.units).sum()
}
