//! Document vault service
//!
//! Uploads are encrypted into an envelope before anything touches disk.
//! Documents open to every shareholder are announced through the
//! [`Notifier`] once stored. Downloads check the caller's role against the document's access level,
//! decrypt, verify the stored SHA-256, and leave an access record in the
//! audit log.

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use crate::audit::{AuditEntry, EntityType};
use crate::config::settings::DocumentSettings;
use crate::crypto::{content_hash, decrypt_from_envelope, seal, Passphrase};
use crate::error::{PortalError, PortalResult};
use crate::models::document::{content_type_for, sanitize_filename};
use crate::models::{AccessLevel, Document, DocumentId, DocumentType, Role, UserId};
use crate::notify::{DocumentNotice, Notifier};
use crate::storage::Storage;

/// Metadata supplied with an upload
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub title: String,
    pub description: String,
    pub document_type: DocumentType,
    pub access_level: AccessLevel,
    /// File name as supplied by the uploader; sanitized before storage
    pub original_filename: String,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub is_audited: bool,
    pub annotation: String,
    pub uploaded_by: UserId,
}

/// Decrypted document contents
#[derive(Debug, Clone)]
pub struct DownloadedDocument {
    pub document: Document,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Documents visible to `role`, newest first. Needs no passphrase.
pub fn visible_documents(storage: &Storage, role: Role) -> PortalResult<Vec<Document>> {
    Ok(storage
        .documents
        .get_all()?
        .into_iter()
        .filter(|d| role.can_view(d.access_level))
        .collect())
}

/// Service for the encrypted document vault
pub struct DocumentService<'a> {
    storage: &'a Storage,
    settings: &'a DocumentSettings,
    passphrase: &'a Passphrase,
    notifier: &'a dyn Notifier,
}

impl<'a> DocumentService<'a> {
    pub fn new(
        storage: &'a Storage,
        settings: &'a DocumentSettings,
        passphrase: &'a Passphrase,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            storage,
            settings,
            passphrase,
            notifier,
        }
    }

    /// Encrypt and store a document
    pub fn upload(
        &self,
        role: Role,
        request: UploadRequest,
        bytes: &[u8],
    ) -> PortalResult<Document> {
        role.require_editor()?;

        let title = request.title.trim();
        if title.is_empty() {
            return Err(PortalError::InvalidInput("Document title is required".into()));
        }

        if bytes.len() as u64 > self.settings.max_file_size {
            return Err(PortalError::InvalidInput(format!(
                "File is {} bytes; the limit is {} bytes",
                bytes.len(),
                self.settings.max_file_size
            )));
        }

        let original_filename = sanitize_filename(&request.original_filename);
        if original_filename.is_empty() {
            return Err(PortalError::InvalidInput("A file name is required".into()));
        }

        let content_type = content_type_for(&original_filename);
        if !self
            .settings
            .allowed_content_types
            .iter()
            .any(|allowed| allowed == content_type)
        {
            return Err(PortalError::InvalidInput(format!(
                "File type {} is not accepted",
                content_type
            )));
        }

        if let (Some(start), Some(end)) = (request.period_start, request.period_end) {
            if end < start {
                return Err(PortalError::InvalidInput(
                    "Reporting period ends before it starts".into(),
                ));
            }
        }

        let sealed = seal(bytes, self.passphrase)?;
        let id = DocumentId::new();
        let file_path = self.storage.documents.write_envelope(id, &sealed.envelope)?;

        let document = Document {
            id,
            title: title.to_string(),
            description: request.description.trim().to_string(),
            document_type: request.document_type,
            access_level: request.access_level,
            original_filename,
            file_path,
            file_size: sealed.plaintext_len,
            file_hash: sealed.content_hash,
            period_start: request.period_start,
            period_end: request.period_end,
            is_audited: request.is_audited,
            annotation: request.annotation.trim().to_string(),
            uploaded_by: request.uploaded_by,
            uploaded_at: Utc::now(),
        };

        if let Err(e) = self.storage.documents.insert(document.clone()) {
            if let Err(cleanup) = self.storage.documents.remove_envelope(&document.file_path) {
                warn!(document_id = %document.id, error = %cleanup, "Orphaned envelope left on disk");
            }
            return Err(e);
        }

        self.storage.audit().log_committed(
            &AuditEntry::create(
                EntityType::Document,
                document.id.to_string(),
                Some(document.title.clone()),
                &document,
            )
            .with_actor(role),
        );

        if document.access_level == AccessLevel::AllShareholders {
            let notice = DocumentNotice::for_document(&document);
            if let Err(e) = self.notifier.notify_document(&notice) {
                warn!(document_id = %document.id, error = %e, "New document notice failed");
            }
        }

        info!(
            document_id = %document.id,
            size = document.file_size,
            access = %document.access_level,
            "Uploaded document"
        );
        Ok(document)
    }

    /// Documents visible to `role`, newest first
    pub fn list(&self, role: Role) -> PortalResult<Vec<Document>> {
        visible_documents(self.storage, role)
    }

    /// Decrypt a document for an authorized reader
    pub fn download(
        &self,
        role: Role,
        user: UserId,
        document_id: DocumentId,
    ) -> PortalResult<DownloadedDocument> {
        let document = self
            .storage
            .documents
            .get(document_id)?
            .ok_or_else(|| PortalError::document_not_found(document_id.to_string()))?;

        if !role.can_view(document.access_level) {
            warn!(document_id = %document.id, role = %role, "Denied document access");
            return Err(PortalError::Forbidden(format!(
                "role '{}' may not read {} documents",
                role, document.access_level
            )));
        }

        let envelope = self.storage.documents.read_envelope(&document)?;
        let bytes = decrypt_from_envelope(&envelope, self.passphrase)?;

        if content_hash(&bytes) != document.file_hash {
            warn!(document_id = %document.id, "Document hash mismatch");
            return Err(PortalError::Integrity(format!(
                "Document {} does not match its stored hash",
                document.id
            )));
        }

        self.storage.log_audit(
            &AuditEntry::access(
                EntityType::Document,
                document.id.to_string(),
                Some(document.title.clone()),
            )
            .with_actor(format!("{} {}", role, user)),
        )?;

        info!(document_id = %document.id, user = %user, "Served document");
        Ok(DownloadedDocument {
            content_type: document.content_type(),
            document,
            bytes,
        })
    }

    /// Location of a document's envelope on disk
    pub fn envelope_path(&self, document: &Document) -> std::path::PathBuf {
        self.storage.documents.envelope_path(&document.file_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::config::paths::PortalPaths;
    use crate::crypto::encrypt_to_envelope;
    use crate::notify::{MessageKind, OutboxNotifier, Recipient};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = PortalPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn request(title: &str, access_level: AccessLevel) -> UploadRequest {
        UploadRequest {
            title: title.to_string(),
            description: String::new(),
            document_type: DocumentType::QuarterlyLetter,
            access_level,
            original_filename: "Q3 letter.pdf".to_string(),
            period_start: None,
            period_end: None,
            is_audited: false,
            annotation: String::new(),
            uploaded_by: UserId::new(),
        }
    }

    fn passphrase() -> Passphrase {
        Passphrase::new("vault-test-passphrase").unwrap()
    }

    #[test]
    fn test_upload_and_download() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = DocumentSettings::default();
        let key = passphrase();
        let notifier = OutboxNotifier::new(storage.paths().outbox_file());
        let service = DocumentService::new(&storage, &settings, &key, &notifier);

        let doc = service
            .upload(
                Role::AdminEdit,
                request("Q3 2025 Letter", AccessLevel::AllShareholders),
                b"%PDF-1.7 letter",
            )
            .unwrap();
        assert_eq!(doc.original_filename, "Q3_letter.pdf");
        assert_eq!(doc.file_size, 15);

        // the envelope on disk is not the plaintext
        let on_disk = std::fs::read(service.envelope_path(&doc)).unwrap();
        assert!(!on_disk.windows(8).any(|w| w == b"%PDF-1.7"));

        let reader = UserId::new();
        let downloaded = service.download(Role::Shareholder, reader, doc.id).unwrap();
        assert_eq!(downloaded.bytes, b"%PDF-1.7 letter");
        assert_eq!(downloaded.content_type, "application/pdf");

        let audit = storage.audit().read_all().unwrap();
        assert_eq!(audit.len(), 2);
        assert_eq!(audit[1].operation, Operation::Access);
        assert!(audit[1].actor.as_deref().unwrap().contains(&reader.to_string()));
    }

    #[test]
    fn test_shareholder_documents_are_announced() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = DocumentSettings::default();
        let key = passphrase();
        let notifier = OutboxNotifier::new(storage.paths().outbox_file());
        let service = DocumentService::new(&storage, &settings, &key, &notifier);

        let letter = service
            .upload(
                Role::AdminEdit,
                request("Q3 2025 Letter", AccessLevel::AllShareholders),
                b"letter",
            )
            .unwrap();
        service
            .upload(
                Role::AdminEdit,
                request("Board minutes", AccessLevel::BoardAndManagementOnly),
                b"minutes",
            )
            .unwrap();

        // board-only uploads are not announced
        let messages = notifier.messages().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].to, Recipient::AllShareholders);
        assert_eq!(messages[0].kind, MessageKind::NewDocument);
        assert_eq!(messages[0].document_id, Some(letter.id));
        assert_eq!(messages[0].subject, "New Document Available: Q3 2025 Letter");
    }

    #[test]
    fn test_failed_announcement_keeps_upload() {
        let (temp_dir, storage) = create_test_storage();
        let settings = DocumentSettings::default();
        let key = passphrase();
        // the outbox path is a directory, so dispatch fails
        let notifier = OutboxNotifier::new(temp_dir.path().to_path_buf());
        let service = DocumentService::new(&storage, &settings, &key, &notifier);

        let doc = service
            .upload(
                Role::AdminEdit,
                request("Letter", AccessLevel::AllShareholders),
                b"letter",
            )
            .unwrap();
        assert!(storage.documents.get(doc.id).unwrap().is_some());
    }

    #[test]
    fn test_audit_failure_after_upload_reports_success() {
        let (_temp_dir, storage) = create_test_storage();
        std::fs::create_dir(storage.paths().audit_log()).unwrap();
        let settings = DocumentSettings::default();
        let key = passphrase();
        let notifier = OutboxNotifier::new(storage.paths().outbox_file());
        let service = DocumentService::new(&storage, &settings, &key, &notifier);

        service
            .upload(
                Role::AdminEdit,
                request("Letter", AccessLevel::AllShareholders),
                b"letter",
            )
            .unwrap();
        assert_eq!(storage.documents.count().unwrap(), 1);
    }

    #[test]
    fn test_failed_metadata_write_removes_envelope() {
        let (_temp_dir, storage) = create_test_storage();
        // documents.json cannot be replaced once it is a directory
        std::fs::create_dir(storage.paths().documents_file()).unwrap();
        let settings = DocumentSettings::default();
        let key = passphrase();
        let notifier = OutboxNotifier::new(storage.paths().outbox_file());
        let service = DocumentService::new(&storage, &settings, &key, &notifier);

        let err = service
            .upload(
                Role::AdminEdit,
                request("Letter", AccessLevel::AllShareholders),
                b"letter",
            )
            .unwrap_err();
        assert!(matches!(err, PortalError::PersistenceFailure(_)));

        let envelopes = std::fs::read_dir(storage.paths().documents_dir())
            .unwrap()
            .count();
        assert_eq!(envelopes, 0);
        assert_eq!(storage.documents.count().unwrap(), 0);
        assert!(notifier.messages().unwrap().is_empty());
    }

    #[test]
    fn test_upload_requires_editor() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = DocumentSettings::default();
        let key = passphrase();
        let notifier = OutboxNotifier::new(storage.paths().outbox_file());
        let service = DocumentService::new(&storage, &settings, &key, &notifier);

        let err = service
            .upload(
                Role::AdminView,
                request("Q3", AccessLevel::AllShareholders),
                b"x",
            )
            .unwrap_err();
        assert!(matches!(err, PortalError::Unauthorized(_)));
    }

    #[test]
    fn test_upload_validation() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = DocumentSettings {
            max_file_size: 4,
            ..DocumentSettings::default()
        };
        let key = passphrase();
        let notifier = OutboxNotifier::new(storage.paths().outbox_file());
        let service = DocumentService::new(&storage, &settings, &key, &notifier);

        let blank = service.upload(Role::AdminEdit, request("  ", AccessLevel::AllShareholders), b"x");
        assert!(blank.unwrap_err().is_invalid_input());

        let too_big = service.upload(
            Role::AdminEdit,
            request("Big", AccessLevel::AllShareholders),
            b"12345",
        );
        assert!(too_big.unwrap_err().is_invalid_input());

        let mut exe = request("Tool", AccessLevel::AllShareholders);
        exe.original_filename = "setup.exe".into();
        assert!(service
            .upload(Role::AdminEdit, exe, b"MZ")
            .unwrap_err()
            .is_invalid_input());

        assert_eq!(storage.documents.count().unwrap(), 0);
    }

    #[test]
    fn test_board_only_visibility() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = DocumentSettings::default();
        let key = passphrase();
        let notifier = OutboxNotifier::new(storage.paths().outbox_file());
        let service = DocumentService::new(&storage, &settings, &key, &notifier);

        let minutes = service
            .upload(
                Role::AdminEdit,
                request("Board minutes", AccessLevel::BoardAndManagementOnly),
                b"minutes",
            )
            .unwrap();
        service
            .upload(
                Role::AdminEdit,
                request("Letter", AccessLevel::AllShareholders),
                b"letter",
            )
            .unwrap();

        assert_eq!(service.list(Role::Shareholder).unwrap().len(), 1);
        assert_eq!(service.list(Role::BoardMember).unwrap().len(), 2);

        let err = service
            .download(Role::Shareholder, UserId::new(), minutes.id)
            .unwrap_err();
        assert!(matches!(err, PortalError::Forbidden(_)));
        assert!(service
            .download(Role::AdminView, UserId::new(), minutes.id)
            .is_ok());
    }

    #[test]
    fn test_tampered_envelope_fails() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = DocumentSettings::default();
        let key = passphrase();
        let notifier = OutboxNotifier::new(storage.paths().outbox_file());
        let service = DocumentService::new(&storage, &settings, &key, &notifier);

        let doc = service
            .upload(
                Role::AdminEdit,
                request("Statement", AccessLevel::AllShareholders),
                b"balance sheet",
            )
            .unwrap();

        let path = service.envelope_path(&doc);
        let mut envelope = std::fs::read(&path).unwrap();
        let last = envelope.len() - 1;
        envelope[last] ^= 0xff;
        std::fs::write(&path, envelope).unwrap();

        let err = service
            .download(Role::AdminEdit, UserId::new(), doc.id)
            .unwrap_err();
        assert!(err.is_integrity());
    }

    #[test]
    fn test_replaced_envelope_fails_hash_check() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = DocumentSettings::default();
        let key = passphrase();
        let notifier = OutboxNotifier::new(storage.paths().outbox_file());
        let service = DocumentService::new(&storage, &settings, &key, &notifier);

        let doc = service
            .upload(
                Role::AdminEdit,
                request("Statement", AccessLevel::AllShareholders),
                b"original",
            )
            .unwrap();

        // a valid envelope under the same passphrase, different content
        let forged = encrypt_to_envelope(b"forged", &key).unwrap();
        std::fs::write(service.envelope_path(&doc), forged).unwrap();

        let err = service
            .download(Role::AdminEdit, UserId::new(), doc.id)
            .unwrap_err();
        assert!(err.is_integrity());
        // no access record for a failed read
        assert_eq!(storage.audit().read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_document() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = DocumentSettings::default();
        let key = passphrase();
        let notifier = OutboxNotifier::new(storage.paths().outbox_file());
        let service = DocumentService::new(&storage, &settings, &key, &notifier);

        let err = service
            .download(Role::AdminEdit, UserId::new(), DocumentId::new())
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
