//! Storage layer for Vestline
//!
//! JSON file storage with atomic writes. Grants and vesting events share one
//! file so they commit together; document metadata and encrypted bodies are
//! kept separately.

pub mod documents;
pub mod file_io;
pub mod init;
pub mod vesting;

pub use documents::DocumentRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use vesting::{DueEvent, VestingRepository, VestingStore, VestingTransaction};

use crate::audit::{AuditEntry, AuditLogger};
use crate::config::paths::PortalPaths;
use crate::error::PortalError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: PortalPaths,
    pub vesting: VestingRepository,
    pub documents: DocumentRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: PortalPaths) -> Result<Self, PortalError> {
        paths.ensure_directories()?;

        Ok(Self {
            vesting: VestingRepository::new(paths.vesting_file()),
            documents: DocumentRepository::new(paths.documents_file(), paths.documents_dir()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &PortalPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), PortalError> {
        self.vesting.load()?;
        self.documents.load()?;
        Ok(())
    }

    /// Get the audit logger
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Append an audit entry
    pub fn log_audit(&self, entry: &AuditEntry) -> Result<(), PortalError> {
        self.audit.log(entry)
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.settings_file().exists()
    }
}
