//! CLI command handlers
//!
//! Bridges the clap argument parsing with the service layer. Identifiers
//! may be given as full UUIDs or in the short `grt-1a2b3c4d` form shown in
//! listings.

pub mod document;
pub mod grant;
pub mod sweep;

pub use document::{handle_document_command, DocumentCommands};
pub use grant::{handle_grant_command, GrantCommands};
pub use sweep::{handle_sweep_command, SweepCommands};

use chrono::NaiveDate;

use crate::crypto::Passphrase;
use crate::error::{PortalError, PortalResult};
use crate::models::{DocumentId, GrantId};
use crate::storage::Storage;

/// Environment variable holding the document vault passphrase
pub const DOCUMENT_KEY_ENV: &str = "VESTLINE_DOCUMENT_KEY";

/// Parse a `YYYY-MM-DD` argument
pub fn parse_date(value: &str) -> PortalResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        PortalError::InvalidInput(format!(
            "Invalid date '{}'. Use YYYY-MM-DD format.",
            value
        ))
    })
}

/// Parse an optional date argument, falling back to `default`
pub fn parse_date_or(value: Option<&str>, default: NaiveDate) -> PortalResult<NaiveDate> {
    value.map(parse_date).transpose().map(|d| d.unwrap_or(default))
}

/// Find a grant by full UUID or short display form
pub fn resolve_grant(storage: &Storage, identifier: &str) -> PortalResult<GrantId> {
    if let Ok(uuid) = uuid::Uuid::parse_str(identifier.trim()) {
        return Ok(GrantId::from_uuid(uuid));
    }

    let short = short_form(identifier, GrantId::PREFIX);
    let matches: Vec<_> = storage
        .vesting
        .all_grants()?
        .into_iter()
        .filter(|g| g.id.as_uuid().to_string().starts_with(&short))
        .map(|g| g.id)
        .collect();

    single_match(matches, "Grant", identifier)
}

/// Find a document by full UUID or short display form
pub fn resolve_document(storage: &Storage, identifier: &str) -> PortalResult<DocumentId> {
    if let Ok(uuid) = uuid::Uuid::parse_str(identifier.trim()) {
        return Ok(DocumentId::from_uuid(uuid));
    }

    let short = short_form(identifier, DocumentId::PREFIX);
    let matches: Vec<_> = storage
        .documents
        .get_all()?
        .into_iter()
        .filter(|d| d.id.as_uuid().to_string().starts_with(&short))
        .map(|d| d.id)
        .collect();

    single_match(matches, "Document", identifier)
}

fn short_form(identifier: &str, prefix: &str) -> String {
    let trimmed = identifier.trim().to_lowercase();
    trimmed
        .strip_prefix(prefix)
        .unwrap_or(trimmed.as_str())
        .to_string()
}

fn single_match<T: Copy>(
    matches: Vec<T>,
    entity_type: &'static str,
    identifier: &str,
) -> PortalResult<T> {
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(PortalError::NotFound {
            entity_type,
            identifier: identifier.to_string(),
        }),
        _ => Err(PortalError::InvalidInput(format!(
            "'{}' matches more than one {}; use the full ID",
            identifier,
            entity_type.to_lowercase()
        ))),
    }
}

/// Read the vault passphrase from the environment, else prompt for it
pub fn read_passphrase() -> PortalResult<Passphrase> {
    if let Ok(value) = std::env::var(DOCUMENT_KEY_ENV) {
        return Passphrase::new(value);
    }

    let entered = rpassword::prompt_password("Document vault passphrase: ")
        .map_err(|e| PortalError::Encryption(format!("Failed to read passphrase: {}", e)))?;
    Passphrase::new(entered)
}
