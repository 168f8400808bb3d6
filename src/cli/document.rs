//! Document vault CLI commands

use std::path::PathBuf;

use clap::Subcommand;

use super::{parse_date, read_passphrase, resolve_document};
use crate::config::settings::Settings;
use crate::display::{format_document_details, format_document_list};
use crate::error::{PortalError, PortalResult};
use crate::models::{AccessLevel, DocumentType, Role, UserId};
use crate::notify::OutboxNotifier;
use crate::services::document::visible_documents;
use crate::services::{DocumentService, UploadRequest};
use crate::storage::file_io::write_bytes_atomic;
use crate::storage::Storage;

/// Document subcommands
#[derive(Subcommand)]
pub enum DocumentCommands {
    /// Encrypt and store a file
    Upload {
        /// File to upload (PDF, DOCX or XLSX)
        file: PathBuf,
        #[arg(short, long)]
        title: String,
        /// financial_statement, quarterly_letter, material_disclosure,
        /// board_minutes or other
        #[arg(long = "type")]
        document_type: String,
        /// all (every shareholder) or board (board and management only)
        #[arg(long, default_value = "all")]
        access: String,
        #[arg(long)]
        description: Option<String>,
        /// Reporting period start (YYYY-MM-DD)
        #[arg(long)]
        period_start: Option<String>,
        /// Reporting period end (YYYY-MM-DD)
        #[arg(long)]
        period_end: Option<String>,
        /// Statements are audited
        #[arg(long)]
        audited: bool,
        #[arg(long)]
        annotation: Option<String>,
    },
    /// List documents visible to the current role
    List,
    /// Show a document's metadata
    Show {
        /// Document ID
        document: String,
    },
    /// Decrypt a document to a file
    Download {
        /// Document ID
        document: String,
        /// Where to write the decrypted file
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Handle a document command
pub fn handle_document_command(
    storage: &Storage,
    settings: &Settings,
    role: Role,
    user: UserId,
    cmd: DocumentCommands,
) -> PortalResult<()> {
    match cmd {
        DocumentCommands::Upload {
            file,
            title,
            document_type,
            access,
            description,
            period_start,
            period_end,
            audited,
            annotation,
        } => {
            let bytes = std::fs::read(&file).map_err(|e| {
                PortalError::Io(format!("Failed to read {}: {}", file.display(), e))
            })?;

            let request = UploadRequest {
                title,
                description: description.unwrap_or_default(),
                document_type: document_type.parse::<DocumentType>()?,
                access_level: access.parse::<AccessLevel>()?,
                original_filename: file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                period_start: period_start.as_deref().map(parse_date).transpose()?,
                period_end: period_end.as_deref().map(parse_date).transpose()?,
                is_audited: audited,
                annotation: annotation.unwrap_or_default(),
                uploaded_by: user,
            };

            // checked before the passphrase prompt
            role.require_editor()?;
            let passphrase = read_passphrase()?;
            let notifier = OutboxNotifier::new(storage.paths().outbox_file());
            let service =
                DocumentService::new(storage, &settings.documents, &passphrase, &notifier);
            let document = service.upload(role, request, &bytes)?;

            println!("Uploaded document: {}", document.id.as_uuid());
            println!("  SHA-256: {}", document.file_hash);
        }

        DocumentCommands::List => {
            let documents = visible_documents(storage, role)?;
            print!("{}", format_document_list(&documents));
        }

        DocumentCommands::Show { document } => {
            let id = resolve_document(storage, &document)?;
            let found = storage
                .documents
                .get(id)?
                .filter(|d| role.can_view(d.access_level))
                .ok_or_else(|| PortalError::document_not_found(&document))?;
            print!("{}", format_document_details(&found));
        }

        DocumentCommands::Download { document, output } => {
            let id = resolve_document(storage, &document)?;
            let passphrase = read_passphrase()?;
            let notifier = OutboxNotifier::new(storage.paths().outbox_file());
            let service =
                DocumentService::new(storage, &settings.documents, &passphrase, &notifier);
            let downloaded = service.download(role, user, id)?;

            write_bytes_atomic(&output, &downloaded.bytes)?;
            println!(
                "Wrote {} ({}, {} bytes)",
                output.display(),
                downloaded.content_type,
                downloaded.bytes.len()
            );
        }
    }

    Ok(())
}
