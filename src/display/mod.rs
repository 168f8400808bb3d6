//! Display formatting for terminal output
//!
//! Plain-text tables and detail views for grants, schedules, documents and
//! sweep results.

pub mod document;
pub mod grant;
pub mod sweep;

pub use document::{format_document_details, format_document_list};
pub use grant::{format_grant_details, format_grant_list, format_schedule, format_summary};
pub use sweep::format_sweep_report;
