//! Infrastructure ports - event publishing and blob storage

use async_trait::async_trait;

use crate::events::FeedEvent;
use crate::value_objects::StorageUrl;

use super::repositories::RepoResult;

/// Publishes feed events; delivery is best effort
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &FeedEvent) -> RepoResult<()>;
}

/// Publisher used when no broker is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPublisher;

#[async_trait]
impl EventPublisher for NoopPublisher {
    async fn publish(&self, _event: &FeedEvent) -> RepoResult<()> {
        Ok(())
    }
}

/// Image storage keyed by object path
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store bytes under `path` and return the download URL
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> RepoResult<String>;

    /// Remove the object; missing objects are not an error
    async fn delete(&self, path: &str) -> RepoResult<()>;

    /// Remove the object a download URL points at
    async fn delete_by_url(&self, url: &str) -> RepoResult<()> {
        let parsed = StorageUrl::parse(url)?;
        self.delete(parsed.path()).await
    }
}
