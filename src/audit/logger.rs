//! Append-only audit log writer
//!
//! Each entry is one JSON line, flushed as soon as it is written.

use std::path::PathBuf;

use tracing::warn;

use crate::error::PortalResult;
use crate::storage::file_io::{append_jsonl, read_jsonl};

use super::entry::AuditEntry;

/// Writes audit entries to the audit log file
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append an entry
    pub fn log(&self, entry: &AuditEntry) -> PortalResult<()> {
        append_jsonl(&self.log_path, entry)
    }

    /// Append an entry for a change that is already committed
    ///
    /// The change stands whether or not the entry is written, so a write
    /// failure is logged instead of returned.
    pub fn log_committed(&self, entry: &AuditEntry) {
        if let Err(e) = self.log(entry) {
            warn!(
                operation = %entry.operation,
                entity = %entry.entity_type,
                entity_id = %entry.entity_id,
                error = %e,
                "Failed to write audit entry"
            );
        }
    }

    /// All entries, oldest first
    pub fn read_all(&self) -> PortalResult<Vec<AuditEntry>> {
        read_jsonl(&self.log_path)
    }

    /// The most recent `count` entries, oldest first
    pub fn read_recent(&self, count: usize) -> PortalResult<Vec<AuditEntry>> {
        let mut all_entries = self.read_all()?;
        let start = all_entries.len().saturating_sub(count);
        Ok(all_entries.split_off(start))
    }

    pub fn exists(&self) -> bool {
        self.log_path.exists()
    }

    pub fn path(&self) -> &PathBuf {
        &self.log_path
    }
}
