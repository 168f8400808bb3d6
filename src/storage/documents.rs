//! Document metadata repository and envelope files
//!
//! Metadata lives in documents.json; each encrypted body lives next to it as
//! `documents/<id>.enc`. The envelope is written before the metadata so a
//! listed document always has a body.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::{PortalError, PortalResult};
use crate::models::{Document, DocumentId};

use super::file_io::{read_bytes, read_json, write_bytes_atomic, write_json_atomic};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct DocumentData {
    documents: Vec<Document>,
}

/// Repository for document metadata and envelopes
pub struct DocumentRepository {
    path: PathBuf,
    envelope_dir: PathBuf,
    data: RwLock<HashMap<DocumentId, Document>>,
}

impl DocumentRepository {
    /// Create a new document repository
    pub fn new(path: PathBuf, envelope_dir: PathBuf) -> Self {
        Self {
            path,
            envelope_dir,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load document metadata from disk
    pub fn load(&self) -> PortalResult<()> {
        let file_data: DocumentData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            PortalError::PersistenceFailure(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        for document in file_data.documents {
            data.insert(document.id, document);
        }

        Ok(())
    }

    /// File name an envelope is stored under (full UUID, not the short form)
    pub fn envelope_file_name(id: DocumentId) -> String {
        format!("{}.enc", id.as_uuid())
    }

    /// Resolve a stored `file_path` inside the envelope directory
    pub fn envelope_path(&self, file_path: &str) -> PathBuf {
        let name = Path::new(file_path)
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(file_path));
        self.envelope_dir.join(name)
    }

    /// Write an envelope body, returning the stored file name
    pub fn write_envelope(&self, id: DocumentId, envelope: &[u8]) -> PortalResult<String> {
        let name = Self::envelope_file_name(id);
        write_bytes_atomic(self.envelope_dir.join(&name), envelope)?;
        Ok(name)
    }

    /// Read the envelope of a stored document
    pub fn read_envelope(&self, document: &Document) -> PortalResult<Vec<u8>> {
        let path = self.envelope_path(&document.file_path);
        if !path.exists() {
            return Err(PortalError::Integrity(format!(
                "Envelope for document {} is missing",
                document.id
            )));
        }
        read_bytes(path)
    }

    /// Delete an envelope whose metadata was never stored
    pub fn remove_envelope(&self, file_path: &str) -> PortalResult<()> {
        let path = self.envelope_path(file_path);
        std::fs::remove_file(&path).map_err(|e| {
            PortalError::Io(format!("Failed to remove {}: {}", path.display(), e))
        })
    }

    /// Add a document. The metadata file is replaced atomically; on failure
    /// the in-memory map is unchanged.
    pub fn insert(&self, document: Document) -> PortalResult<()> {
        let mut data = self.data.write().map_err(|e| {
            PortalError::PersistenceFailure(format!("Failed to acquire write lock: {}", e))
        })?;

        if data.contains_key(&document.id) {
            return Err(PortalError::PersistenceFailure(format!(
                "Document {} already exists",
                document.id
            )));
        }

        let mut documents: Vec<_> = data.values().cloned().collect();
        documents.push(document.clone());
        documents.sort_by(|a, b| a.uploaded_at.cmp(&b.uploaded_at));
        write_json_atomic(&self.path, &DocumentData { documents })?;

        data.insert(document.id, document);
        Ok(())
    }

    /// Get a document by ID
    pub fn get(&self, id: DocumentId) -> PortalResult<Option<Document>> {
        let data = self.data.read().map_err(|e| {
            PortalError::PersistenceFailure(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// All documents, newest first
    pub fn get_all(&self) -> PortalResult<Vec<Document>> {
        let data = self.data.read().map_err(|e| {
            PortalError::PersistenceFailure(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut documents: Vec<_> = data.values().cloned().collect();
        documents.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(documents)
    }

    /// Count documents
    pub fn count(&self) -> PortalResult<usize> {
        let data = self.data.read().map_err(|e| {
            PortalError::PersistenceFailure(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccessLevel, DocumentType, UserId};
    use chrono::{Duration, Utc};
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, DocumentRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = DocumentRepository::new(
            temp_dir.path().join("documents.json"),
            temp_dir.path().join("documents"),
        );
        (temp_dir, repo)
    }

    fn document(title: &str) -> Document {
        let id = DocumentId::new();
        Document {
            id,
            title: title.to_string(),
            description: String::new(),
            document_type: DocumentType::FinancialStatement,
            access_level: AccessLevel::AllShareholders,
            original_filename: format!("{}.pdf", title),
            file_path: DocumentRepository::envelope_file_name(id),
            file_size: 3,
            file_hash: String::new(),
            period_start: None,
            period_end: None,
            is_audited: false,
            annotation: String::new(),
            uploaded_by: UserId::new(),
            uploaded_at: Utc::now(),
        }
    }

    #[test]
    fn test_insert_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        let doc = document("q1");
        let id = doc.id;
        repo.insert(doc).unwrap();

        let repo2 = DocumentRepository::new(
            temp_dir.path().join("documents.json"),
            temp_dir.path().join("documents"),
        );
        repo2.load().unwrap();
        assert_eq!(repo2.get(id).unwrap().unwrap().title, "q1");
    }

    #[test]
    fn test_newest_first() {
        let (_temp_dir, repo) = create_test_repo();
        let mut older = document("older");
        older.uploaded_at = Utc::now() - Duration::days(2);
        let newer = document("newer");

        repo.insert(older).unwrap();
        repo.insert(newer).unwrap();

        let titles: Vec<_> = repo.get_all().unwrap().into_iter().map(|d| d.title).collect();
        assert_eq!(titles, vec!["newer", "older"]);
    }

    #[test]
    fn test_envelope_round_trip() {
        let (temp_dir, repo) = create_test_repo();
        let doc = document("minutes");
        let name = repo.write_envelope(doc.id, b"sealed").unwrap();

        assert_eq!(name, doc.file_path);
        assert!(temp_dir.path().join("documents").join(&name).exists());
        assert_eq!(repo.read_envelope(&doc).unwrap(), b"sealed");
    }

    #[test]
    fn test_remove_envelope() {
        let (temp_dir, repo) = create_test_repo();
        let doc = document("draft");
        let name = repo.write_envelope(doc.id, b"sealed").unwrap();

        repo.remove_envelope(&name).unwrap();
        assert!(!temp_dir.path().join("documents").join(&name).exists());
        assert!(repo.remove_envelope(&name).is_err());
    }

    #[test]
    fn test_missing_envelope_is_integrity_error() {
        let (_temp_dir, repo) = create_test_repo();
        let doc = document("gone");
        assert!(repo.read_envelope(&doc).unwrap_err().is_integrity());
    }

    #[test]
    fn test_envelope_path_stays_in_directory() {
        let (temp_dir, repo) = create_test_repo();
        let path = repo.envelope_path("../../etc/passwd");
        assert_eq!(path, temp_dir.path().join("documents").join("passwd"));
    }
}
