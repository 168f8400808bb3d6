//! User settings for Vestline
//!
//! Holds the switches that used to live in process environment: whether the
//! daily sweeps run, how far ahead reminders go out, and document upload
//! limits.

use serde::{Deserialize, Serialize};

use super::paths::PortalPaths;
use crate::error::PortalError;

/// Default number of days before a vesting date that a reminder goes out
pub const DEFAULT_PRE_VEST_LEAD_DAYS: u32 = 7;

/// Default maximum upload size (100 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 104_857_600;

/// Switches for the daily vesting sweeps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VestingSettings {
    /// Realize vesting events and send "vested" notices
    #[serde(default)]
    pub enable_auto_vesting: bool,

    /// Send reminders ahead of upcoming vesting dates
    #[serde(default)]
    pub enable_pre_vest_notifications: bool,

    /// Days ahead of the vesting date that the reminder is sent
    #[serde(default = "default_lead_days")]
    pub pre_vest_lead_days: u32,
}

fn default_lead_days() -> u32 {
    DEFAULT_PRE_VEST_LEAD_DAYS
}

impl Default for VestingSettings {
    fn default() -> Self {
        Self {
            enable_auto_vesting: false,
            enable_pre_vest_notifications: false,
            pre_vest_lead_days: DEFAULT_PRE_VEST_LEAD_DAYS,
        }
    }
}

impl VestingSettings {
    /// Both sweeps switched on with the default lead time
    pub fn enabled() -> Self {
        Self {
            enable_auto_vesting: true,
            enable_pre_vest_notifications: true,
            pre_vest_lead_days: DEFAULT_PRE_VEST_LEAD_DAYS,
        }
    }
}

/// Document upload limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSettings {
    /// Maximum plaintext size in bytes
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// Accepted MIME types
    #[serde(default = "default_allowed_types")]
    pub allowed_content_types: Vec<String>,
}

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

fn default_allowed_types() -> Vec<String> {
    vec![
        "application/pdf".to_string(),
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document".to_string(),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet".to_string(),
    ]
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
            allowed_content_types: default_allowed_types(),
        }
    }
}

/// Settings for Vestline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Sweep switches
    #[serde(default)]
    pub vesting: VestingSettings,

    /// Upload limits
    #[serde(default)]
    pub documents: DocumentSettings,
}

fn default_schema_version() -> u32 {
    1
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            vesting: VestingSettings::default(),
            documents: DocumentSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &PortalPaths) -> Result<Self, PortalError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| PortalError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                PortalError::InvalidConfiguration(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &PortalPaths) -> Result<(), PortalError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            PortalError::InvalidConfiguration(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| PortalError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
