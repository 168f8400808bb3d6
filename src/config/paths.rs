//! Path management for Vestline
//!
//! Provides XDG-compliant path resolution for configuration, data, and
//! encrypted documents.
//!
//! ## Path Resolution Order
//!
//! 1. `VESTLINE_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/vestline` or `~/.config/vestline`
//! 3. Windows: `%APPDATA%\vestline`

use std::path::PathBuf;

use crate::error::PortalError;

/// Manages all paths used by Vestline
#[derive(Debug, Clone)]
pub struct PortalPaths {
    /// Base directory for all Vestline data
    base_dir: PathBuf,
}

impl PortalPaths {
    /// Create a new PortalPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, PortalError> {
        let base_dir = if let Ok(custom) = std::env::var("VESTLINE_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create PortalPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/vestline/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (~/.config/vestline/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Directory holding `<document-id>.enc` envelopes
    pub fn documents_dir(&self) -> PathBuf {
        self.base_dir.join("documents")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to the notification outbox (JSONL)
    pub fn outbox_file(&self) -> PathBuf {
        self.base_dir.join("outbox.jsonl")
    }

    /// Grants and their vesting events share one file so they commit together
    pub fn vesting_file(&self) -> PathBuf {
        self.data_dir().join("vesting.json")
    }

    /// Get the path to documents.json (document metadata)
    pub fn documents_file(&self) -> PathBuf {
        self.data_dir().join("documents.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), PortalError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| PortalError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| PortalError::Io(format!("Failed to create data directory: {}", e)))?;

        std::fs::create_dir_all(self.documents_dir()).map_err(|e| {
            PortalError::Io(format!("Failed to create documents directory: {}", e))
        })?;

        Ok(())
    }

    /// Check if Vestline has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, PortalError> {
    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(config_home).join("vestline"));
    }
    let home = std::env::var("HOME")
        .map_err(|_| PortalError::InvalidConfiguration("HOME is not set".into()))?;
    Ok(PathBuf::from(home).join(".config").join("vestline"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, PortalError> {
    let appdata = std::env::var("APPDATA").map_err(|_| {
        PortalError::InvalidConfiguration("Could not determine APPDATA directory".into())
    })?;
    Ok(PathBuf::from(appdata).join("vestline"))
}
