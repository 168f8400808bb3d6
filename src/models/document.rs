//! Document model
//!
//! Metadata for one encrypted file. The plaintext never touches disk; the
//! record points at the envelope and carries a SHA-256 of the plaintext for
//! tamper detection independent of the cipher tag.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{DocumentId, UserId};
use crate::error::PortalError;

/// Who may read a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    #[default]
    AllShareholders,
    BoardAndManagementOnly,
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllShareholders => write!(f, "all_shareholders"),
            Self::BoardAndManagementOnly => write!(f, "board_and_management_only"),
        }
    }
}

impl FromStr for AccessLevel {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "all_shareholders" | "all" => Ok(Self::AllShareholders),
            "board_and_management_only" | "board" => Ok(Self::BoardAndManagementOnly),
            other => Err(PortalError::InvalidInput(format!(
                "Unknown access level '{}'",
                other
            ))),
        }
    }
}

/// Kind of investor document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    #[default]
    FinancialStatement,
    QuarterlyLetter,
    MaterialDisclosure,
    BoardMinutes,
    Other,
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FinancialStatement => write!(f, "financial_statement"),
            Self::QuarterlyLetter => write!(f, "quarterly_letter"),
            Self::MaterialDisclosure => write!(f, "material_disclosure"),
            Self::BoardMinutes => write!(f, "board_minutes"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl FromStr for DocumentType {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "financial_statement" => Ok(Self::FinancialStatement),
            "quarterly_letter" => Ok(Self::QuarterlyLetter),
            "material_disclosure" => Ok(Self::MaterialDisclosure),
            "board_minutes" => Ok(Self::BoardMinutes),
            "other" => Ok(Self::Other),
            other => Err(PortalError::InvalidInput(format!(
                "Unknown document type '{}'",
                other
            ))),
        }
    }
}

/// Stored metadata for an uploaded document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,

    pub title: String,

    #[serde(default)]
    pub description: String,

    pub document_type: DocumentType,

    #[serde(default)]
    pub access_level: AccessLevel,

    /// Sanitized name of the file as uploaded
    pub original_filename: String,

    /// Location of the envelope on disk
    pub file_path: String,

    /// Plaintext size in bytes
    pub file_size: u64,

    /// Hex SHA-256 of the plaintext
    pub file_hash: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_start: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_end: Option<NaiveDate>,

    #[serde(default)]
    pub is_audited: bool,

    #[serde(default)]
    pub annotation: String,

    pub uploaded_by: UserId,

    pub uploaded_at: DateTime<Utc>,
}

impl Document {
    /// MIME type to serve the decrypted bytes with: the title extension,
    /// else the original file name's
    pub fn content_type(&self) -> &'static str {
        match content_type_for(&self.title) {
            OCTET_STREAM => content_type_for(&self.original_filename),
            known => known,
        }
    }
}

/// Fallback MIME type for unknown extensions
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Guess a MIME type from a file name
pub fn content_type_for(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    if lower.ends_with(".pdf") {
        "application/pdf"
    } else if lower.ends_with(".docx") {
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    } else if lower.ends_with(".xlsx") {
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    } else {
        OCTET_STREAM
    }
}

/// Reduce an uploaded file name to a safe basename
///
/// Directory components are dropped and anything outside `[A-Za-z0-9.-]`
/// becomes `_`.
pub fn sanitize_filename(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    base.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
