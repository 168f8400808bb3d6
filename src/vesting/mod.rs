//! Vesting schedule engine
//!
//! Pure computation only; persistence and notification live in
//! `services::grant` and `services::sweep`.

pub mod calculator;

#[cfg(test)]
mod proptest_schedule;

pub use calculator::{compute_schedule, total_units, ScheduledVesting};
