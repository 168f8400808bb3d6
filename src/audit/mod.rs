//! Audit logging for Vestline
//!
//! Grant creation and cancellation, document uploads and every document
//! download are appended to a line-delimited JSON log that is never
//! rewritten.
//!
//! # Example
//!
//! ```rust,ignore
//! use vestline::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! let entry = AuditEntry::create(EntityType::Grant, grant.id.to_string(), None, &grant)
//!     .with_actor(Role::AdminEdit);
//! logger.log(&entry)?;
//! ```

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
