//! Configuration module for Vestline
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - Settings persistence (sweep switches, upload limits)

pub mod paths;
pub mod settings;

pub use paths::PortalPaths;
pub use settings::{DocumentSettings, Settings, VestingSettings};
