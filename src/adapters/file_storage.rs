//! Storage for files uploaded with call feedback
//!
//! Files are written through an [`ObjectStore`] rooted at the configured
//! upload directory and served back under `/uploads/`.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use dialdesk_forms::{Attachment, StoredFile};
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, PutPayload};
use uuid::Uuid;

use crate::adapters::submission::UploadedFile;

/// URL prefix stored files are served under
pub const UPLOADS_ROUTE: &str = "/uploads";

pub type UploadResult<T> = Result<T, UploadError>;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid upload path: {0}")]
    InvalidPath(String),

    #[error("Upload not found: {0}")]
    NotFound(String),
}

pub struct UploadStore {
    store: Arc<dyn ObjectStore>,
}

impl UploadStore {
    /// Local store rooted at `dir`; the directory is created if missing
    pub fn local(dir: impl AsRef<Path>) -> UploadResult<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let store = LocalFileSystem::new_with_prefix(dir)?;
        tracing::info!("Storing uploads under {}", dir.display());
        Ok(Self::with_store(Arc::new(store)))
    }

    pub fn with_store(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Object key of an upload: `calls/{call_id}/{field}/{uuid}.{ext}`
    fn upload_key(call_id: Uuid, field_name: &str, extension: &str) -> String {
        let file_id = Uuid::new_v4();
        let mut key = format!("calls/{}/{}/{}", call_id, path_segment(field_name), file_id);
        if !extension.is_empty() {
            key.push('.');
            key.push_str(extension);
        }
        key
    }

    /// Write an uploaded file and return the reference kept in the call's feedback
    pub async fn save(&self, call_id: Uuid, field_name: &str, file: &UploadedFile) -> UploadResult<StoredFile> {
        let key = Self::upload_key(call_id, field_name, &file.extension());
        let location = ObjectPath::parse(&key).map_err(|e| UploadError::InvalidPath(e.to_string()))?;

        self.store
            .put(&location, PutPayload::from_bytes(file.bytes.clone()))
            .await?;

        tracing::debug!("Stored upload '{}' for call {} at {}", file.file_name(), call_id, key);

        Ok(StoredFile {
            file_name: file.file_name(),
            file_url: format!("{}/{}", UPLOADS_ROUTE, key),
            uploaded_at: Some(Utc::now()),
        })
    }

    /// Read a stored file by its key (the part of the URL after `/uploads/`)
    pub async fn read(&self, key: &str) -> UploadResult<Bytes> {
        let location = object_location(key)?;

        match self.store.get(&location).await {
            Ok(result) => Ok(result.bytes().await?),
            Err(object_store::Error::NotFound { .. }) => Err(UploadError::NotFound(key.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove a stored file by the URL it was handed out under; a file that is
    /// already gone is not an error
    pub async fn remove(&self, file_url: &str) -> UploadResult<()> {
        let key = file_url
            .strip_prefix(UPLOADS_ROUTE)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| UploadError::InvalidPath(file_url.to_string()))?;
        let location = object_location(key)?;

        match self.store.delete(&location).await {
            Ok(()) | Err(object_store::Error::NotFound { .. }) => {
                tracing::debug!("Removed upload {}", key);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn object_location(key: &str) -> UploadResult<ObjectPath> {
    if key.split('/').any(|segment| segment == "..") {
        return Err(UploadError::InvalidPath(key.to_string()));
    }
    ObjectPath::parse(key).map_err(|e| UploadError::InvalidPath(e.to_string()))
}

/// Field names are free text; keep object keys to a safe alphabet
fn path_segment(name: &str) -> String {
    let segment: String = name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c.to_ascii_lowercase() } else { '_' })
        .collect();
    if segment.is_empty() {
        "field".to_string()
    } else {
        segment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str, body: &'static [u8]) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: None,
            bytes: Bytes::from_static(body),
        }
    }

    #[test]
    fn test_path_segment() {
        assert_eq!(path_segment("Signed contract"), "signed_contract");
        assert_eq!(path_segment("../etc"), "___etc");
        assert_eq!(path_segment("  "), "field");
    }

    #[test]
    fn test_upload_key_layout() {
        let call_id = Uuid::new_v4();
        let key = UploadStore::upload_key(call_id, "Proof", "pdf");
        assert!(key.starts_with(&format!("calls/{}/proof/", call_id)));
        assert!(key.ends_with(".pdf"));

        let key = UploadStore::upload_key(call_id, "Proof", "");
        assert!(!key.contains('.'));
    }

    #[tokio::test]
    async fn test_save_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::local(dir.path()).unwrap();
        let call_id = Uuid::new_v4();

        let stored = store.save(call_id, "Proof", &upload("receipt.PDF", b"%PDF-1.4")).await.unwrap();
        assert_eq!(stored.file_name, "receipt.PDF");
        assert!(stored.file_url.ends_with(".pdf"));
        assert!(stored.uploaded_at.is_some());

        let key = stored.file_url.trim_start_matches("/uploads/");
        let bytes = store.read(key).await.unwrap();
        assert_eq!(&bytes[..], b"%PDF-1.4");
    }

    #[tokio::test]
    async fn test_read_missing_and_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::local(dir.path()).unwrap();

        assert!(matches!(store.read("calls/none.pdf").await, Err(UploadError::NotFound(_))));
        assert!(matches!(store.read("../secret").await, Err(UploadError::InvalidPath(_))));
    }

    #[tokio::test]
    async fn test_remove_by_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::local(dir.path()).unwrap();

        let stored = store.save(Uuid::new_v4(), "Proof", &upload("a.pdf", b"%PDF")).await.unwrap();
        store.remove(&stored.file_url).await.unwrap();

        let key = stored.file_url.trim_start_matches("/uploads/");
        assert!(matches!(store.read(key).await, Err(UploadError::NotFound(_))));
        assert!(store.remove(&stored.file_url).await.is_ok());
        assert!(matches!(store.remove("/elsewhere/a.pdf").await, Err(UploadError::InvalidPath(_))));
    }
}
