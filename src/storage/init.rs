//! Storage initialization
//!
//! First-run setup: directories, default settings and empty data files.

use crate::config::paths::PortalPaths;
use crate::config::settings::Settings;
use crate::error::PortalError;

use super::file_io::write_json_atomic;

/// Initialize storage for a fresh installation
///
/// Existing files are left alone, so running it twice is harmless.
pub fn initialize_storage(paths: &PortalPaths) -> Result<(), PortalError> {
    paths.ensure_directories()?;

    if !paths.settings_file().exists() {
        Settings::default().save(paths)?;
    }

    if !paths.vesting_file().exists() {
        write_json_atomic(
            paths.vesting_file(),
            &serde_json::json!({ "grants": [], "events": [] }),
        )?;
    }

    if !paths.documents_file().exists() {
        write_json_atomic(paths.documents_file(), &serde_json::json!({ "documents": [] }))?;
    }

    Ok(())
}

/// Whether `initialize_storage` still needs to run
pub fn needs_initialization(paths: &PortalPaths) -> bool {
    !paths.settings_file().exists()
}
