//! Property-based tests for schedule computation.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::calculator::{compute_schedule, total_units};
use crate::models::{Units, VestingFrequency, VestingTerms};

fn frequency() -> impl Strategy<Value = VestingFrequency> {
    prop_oneof![
        Just(VestingFrequency::Monthly),
        Just(VestingFrequency::Quarterly),
        Just(VestingFrequency::Annually),
    ]
}

/// Unit totals with up to four decimal places
fn total() -> impl Strategy<Value = Units> {
    (1i64..100_000_000, 0u32..5).prop_map(|(mantissa, scale)| Units::new(Decimal::new(mantissa, scale)))
}

fn start_date() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2040, 1u32..=12, 1u32..=31).prop_map(|(y, m, d)| {
        NaiveDate::from_ymd_opt(y, m, d)
            .or_else(|| NaiveDate::from_ymd_opt(y, m, 28))
            .unwrap()
    })
}

fn terms() -> impl Strategy<Value = VestingTerms> {
    (total(), 0u32..60, 1u32..121, frequency(), start_date()).prop_map(
        |(total_units, cliff_months, duration_months, frequency, start)| VestingTerms {
            grant_date: start,
            vesting_start_date: start,
            total_units,
            cliff_months,
            duration_months,
            frequency,
        },
    )
}

proptest! {
    /// Property: valid terms always distribute exactly the granted units.
    #[test]
    fn prop_units_sum_to_total(t in terms(), reference in start_date()) {
        prop_assume!(t.validate().is_ok());

        let schedule = compute_schedule(&t, reference).unwrap();
        prop_assert!(!schedule.is_empty());
        prop_assert_eq!(total_units(&schedule), t.total_units);
        prop_assert!(schedule.iter().all(|e| e.units.is_positive()));
    }

    /// Property: dates strictly increase.
    #[test]
    fn prop_dates_strictly_increase(t in terms(), reference in start_date()) {
        prop_assume!(t.validate().is_ok());

        let schedule = compute_schedule(&t, reference).unwrap();
        for pair in schedule.windows(2) {
            prop_assert!(pair[0].vesting_date < pair[1].vesting_date);
        }
    }

    /// Property: projection is exactly "date after reference".
    #[test]
    fn prop_projection_matches_reference(t in terms(), reference in start_date()) {
        prop_assume!(t.validate().is_ok());

        let schedule = compute_schedule(&t, reference).unwrap();
        for event in &schedule {
            prop_assert_eq!(event.is_projected, event.vesting_date > reference);
        }
    }

    /// Property: the same inputs give the same output.
    #[test]
    fn prop_deterministic(t in terms(), reference in start_date()) {
        let first = compute_schedule(&t, reference).ok();
        let second = compute_schedule(&t, reference).ok();
        prop_assert_eq!(first, second);
    }

    /// Property: no event lands before the cliff, and the durations that fit
    /// no interval produce nothing.
    #[test]
    fn prop_respects_cliff_and_interval(t in terms(), reference in start_date()) {
        let Ok(schedule) = compute_schedule(&t, reference) else {
            return Ok(());
        };

        if t.duration_months < t.frequency.interval_months() {
            prop_assert!(schedule.is_empty());
        }

        if let Some(cliff_date) = t
            .vesting_start_date
            .checked_add_months(chrono::Months::new(t.cliff_months))
        {
            for event in &schedule {
                prop_assert!(event.vesting_date >= cliff_date);
            }
        }
    }
}
