//! Service layer for Vestline
//!
//! Business logic on top of the storage layer: role checks, validation,
//! audit records and the daily sweeps.

pub mod document;
pub mod grant;
pub mod sweep;

pub use document::{DocumentService, DownloadedDocument, UploadRequest};
pub use grant::{GrantService, NewGrant, VestingSummary};
pub use sweep::{DailySweepReport, SweepReport, VestingSweep};
