//! Core data models for Vestline
//!
//! This module contains the data structures of the vesting and document
//! domain: grants, vesting events, documents and portal roles.

pub mod document;
pub mod grant;
pub mod ids;
pub mod role;
pub mod units;
pub mod vesting_event;

pub use document::{AccessLevel, Document, DocumentType};
pub use grant::{Grant, GrantStatus, GrantValidationError, VestingFrequency, VestingTerms};
pub use ids::{DocumentId, GrantId, ShareClassId, ShareholderId, UserId, VestingEventId};
pub use role::Role;
pub use units::Units;
pub use vesting_event::{NotificationKind, VestingEvent};
