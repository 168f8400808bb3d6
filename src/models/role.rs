//! Portal roles and the capability checks derived from them

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::document::AccessLevel;
use crate::error::PortalError;

/// Role of an authenticated portal user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    AdminEdit,
    AdminView,
    BoardMember,
    Shareholder,
}

impl Role {
    /// Only edit-capable administrators may create or cancel grants and
    /// upload documents
    pub fn is_authorized_editor(&self) -> bool {
        matches!(self, Self::AdminEdit)
    }

    /// Whether documents at `level` are visible to this role
    pub fn can_view(&self, level: AccessLevel) -> bool {
        match level {
            AccessLevel::AllShareholders => true,
            AccessLevel::BoardAndManagementOnly => {
                matches!(self, Self::AdminEdit | Self::AdminView | Self::BoardMember)
            }
        }
    }

    /// Fail with `Unauthorized` unless this role can edit
    pub fn require_editor(&self) -> Result<(), PortalError> {
        if self.is_authorized_editor() {
            Ok(())
        } else {
            Err(PortalError::Unauthorized(format!(
                "role '{}' does not have edit access",
                self
            )))
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdminEdit => write!(f, "admin_edit"),
            Self::AdminView => write!(f, "admin_view"),
            Self::BoardMember => write!(f, "board_member"),
            Self::Shareholder => write!(f, "shareholder"),
        }
    }
}

impl FromStr for Role {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "admin_edit" => Ok(Self::AdminEdit),
            "admin_view" => Ok(Self::AdminView),
            "board_member" | "board" => Ok(Self::BoardMember),
            "shareholder" => Ok(Self::Shareholder),
            other => Err(PortalError::InvalidInput(format!("Unknown role '{}'", other))),
        }
    }
}
