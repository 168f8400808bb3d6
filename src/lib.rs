//! Vestline - RSU vesting engine and encrypted document vault
//!
//! This library computes restricted stock unit vesting schedules, stores
//! grants together with their schedules, runs the daily vesting and
//! reminder sweeps, and keeps investor documents encrypted at rest.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (grants, vesting events, documents, roles)
//! - `vesting`: Pure schedule computation
//! - `crypto`: Document envelope encryption
//! - `storage`: JSON file storage layer
//! - `notify`: Vesting notices and the outbox
//! - `services`: Business logic layer
//! - `audit`: Audit logging system
//!
//! # Example
//!
//! ```rust,ignore
//! use vestline::models::{Units, VestingFrequency, VestingTerms};
//! use vestline::vesting::compute_schedule;
//!
//! let schedule = compute_schedule(&terms, today)?;
//! ```

pub mod audit;
pub mod cli;
pub mod clock;
pub mod config;
pub mod crypto;
pub mod display;
pub mod error;
pub mod models;
pub mod notify;
pub mod services;
pub mod storage;
pub mod vesting;

pub use error::{PortalError, PortalResult};
