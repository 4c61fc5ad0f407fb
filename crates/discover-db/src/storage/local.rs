//! Filesystem-backed blob store
//!
//! Objects live under the configured upload directory at their object path;
//! the returned download URLs use the storage URL form so delete-by-URL works
//! the same as against the hosted bucket.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use discover_core::{BlobStore, DomainError, RepoResult, StorageUrl};

#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
    bucket: String,
    max_bytes: u64,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>, bucket: impl Into<String>, max_bytes: u64) -> Self {
        Self {
            root: root.into(),
            bucket: bucket.into(),
            max_bytes,
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Resolve an object path, refusing anything that would escape the root
    fn resolve(&self, object_path: &str) -> RepoResult<PathBuf> {
        let relative = Path::new(object_path);
        let safe = !object_path.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(DomainError::ValidationError(format!(
                "invalid object path: {object_path}"
            )));
        }
        Ok(self.root.join(relative))
    }
}

fn storage_error(e: std::io::Error) -> DomainError {
    DomainError::StorageError(e.to_string())
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> RepoResult<String> {
        if bytes.len() as u64 > self.max_bytes {
            return Err(DomainError::FileTooLarge {
                max_bytes: self.max_bytes,
            });
        }
        if !content_type.starts_with("image/") {
            return Err(DomainError::ValidationError(format!(
                "unsupported content type: {content_type}"
            )));
        }

        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(storage_error)?;
        }
        tokio::fs::write(&target, bytes).await.map_err(storage_error)?;

        info!(path, "Stored object");
        Ok(StorageUrl::new(&self.bucket, path).to_string())
    }

    #[instrument(skip(self))]
    async fn delete(&self, path: &str) -> RepoResult<()> {
        let target = self.resolve(path)?;
        match tokio::fs::remove_file(&target).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path, "Object already gone");
                Ok(())
            }
            Err(e) => Err(storage_error(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &tempfile::TempDir) -> LocalBlobStore {
        LocalBlobStore::new(dir.path(), "test-bucket", 16)
    }

    #[tokio::test]
    async fn test_upload_then_delete_by_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        let url = store
            .upload("blocks/1/cover.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();
        assert!(url.starts_with("https://firebasestorage.googleapis.com/v0/b/test-bucket/o/"));
        assert!(dir.path().join("blocks/1/cover.png").exists());

        store.delete_by_url(&url).await.unwrap();
        assert!(!dir.path().join("blocks/1/cover.png").exists());

        // second delete is a no-op
        store.delete_by_url(&url).await.unwrap();
    }

    #[tokio::test]
    async fn test_upload_enforces_size_and_type() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        let err = store.upload("a.png", vec![0; 17], "image/png").await.unwrap_err();
        assert!(matches!(err, DomainError::FileTooLarge { max_bytes: 16 }));

        let err = store.upload("a.txt", vec![0; 2], "text/plain").await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_paths_cannot_escape_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        for path in ["../evil.png", "/etc/passwd", "", "a/../../b.png"] {
            assert!(store.upload(path, vec![1], "image/png").await.is_err(), "{path}");
        }
    }

    #[tokio::test]
    async fn test_delete_rejects_foreign_url() {
        let dir = tempfile::tempdir().unwrap();
        let err = store(&dir)
            .delete_by_url("https://cdn.example.com/x.png")
            .await
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_STORAGE_URL");
    }
}
