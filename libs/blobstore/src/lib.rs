//! Opaque-key blob storage.
//!
//! The tracker stores only the key returned by [`BlobStore::put`]; what sits
//! behind the key is this crate's concern. The filesystem implementation is
//! the default backend; the trait seam exists so deployments can swap in an
//! object store without touching the tracker.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum BlobError {
    #[error("Blob not found: {key}")]
    NotFound { key: String },

    #[error("Invalid blob key: {key}")]
    InvalidKey { key: String },

    #[error("Blob I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` and return an opaque key. `filename` is only a hint used
    /// to preserve the extension.
    async fn put(&self, filename: &str, bytes: &[u8]) -> Result<String, BlobError>;

    /// Fetch the bytes behind a key.
    async fn get(&self, key: &str) -> Result<Vec<u8>, BlobError>;

    /// Remove a blob. Returns false when the key was already absent.
    async fn delete(&self, key: &str) -> Result<bool, BlobError>;
}

/// Filesystem-backed store. Keys are `<uuid>` plus the sanitized extension of
/// the original filename, so a key never escapes the root directory.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the root directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, BlobError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, BlobError> {
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        {
            return Err(BlobError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(self.root.join(key))
    }
}

/// Keep at most one short alphanumeric extension from the client filename.
fn sanitized_extension(filename: &str) -> Option<String> {
    let ext = Path::new(filename).extension()?.to_str()?;
    if ext.len() <= 16 && ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some(ext.to_ascii_lowercase())
    } else {
        None
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, filename: &str, bytes: &[u8]) -> Result<String, BlobError> {
        let key = match sanitized_extension(filename) {
            Some(ext) => format!("{}.{ext}", Uuid::new_v4()),
            None => Uuid::new_v4().to_string(),
        };
        let path = self.path_for(&key)?;
        tokio::fs::write(&path, bytes).await?;
        Ok(key)
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, BlobError> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(BlobError::NotFound {
                key: key.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, key: &str) -> Result<bool, BlobError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> (tempfile::TempDir, FsBlobStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FsBlobStore::open(dir.path().join("blobs"))
            .await
            .expect("open store");
        (dir, store)
    }

    #[tokio::test]
    async fn put_get_delete_roundtrip() {
        let (_dir, store) = store().await;

        let key = store.put("report.txt", b"hello blob").await.unwrap();
        assert!(key.ends_with(".txt"));

        let bytes = store.get(&key).await.unwrap();
        assert_eq!(bytes, b"hello blob");

        assert!(store.delete(&key).await.unwrap());
        assert!(!store.delete(&key).await.unwrap());
        assert!(matches!(
            store.get(&key).await,
            Err(BlobError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn hostile_filename_does_not_leak_into_key() {
        let (_dir, store) = store().await;

        let key = store.put("../../etc/passwd", b"x").await.unwrap();
        assert!(!key.contains('/'));
        assert_eq!(store.get(&key).await.unwrap(), b"x");
    }

    #[tokio::test]
    async fn traversal_key_rejected() {
        let (_dir, store) = store().await;

        assert!(matches!(
            store.get("../outside").await,
            Err(BlobError::InvalidKey { .. })
        ));
        assert!(matches!(
            store.delete("a/b").await,
            Err(BlobError::InvalidKey { .. })
        ));
    }

    #[test]
    fn extension_sanitizer() {
        assert_eq!(sanitized_extension("a.TXT").as_deref(), Some("txt"));
        assert_eq!(sanitized_extension("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(sanitized_extension("no_extension"), None);
        assert_eq!(sanitized_extension("weird.ex!t"), None);
    }
}
