//! Shared fixtures for service tests

use std::sync::Arc;

use async_trait::async_trait;
use discover_common::auth::JwtService;
use discover_core::{
    Block, BlockRepository, EventPublisher, FeedEvent, RepoResult, Snowflake, UserKey,
};
use discover_db::{LocalBlobStore, MemoryDatabase};
use parking_lot::Mutex;
use tempfile::TempDir;

use super::context::ServiceContext;

#[derive(Default)]
pub struct RecordingPublisher {
    pub events: Mutex<Vec<FeedEvent>>,
}

impl RecordingPublisher {
    pub fn types(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(FeedEvent::event_type).collect()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, event: &FeedEvent) -> RepoResult<()> {
        self.events.lock().push(event.clone());
        Ok(())
    }
}

pub struct TestEnv {
    pub ctx: ServiceContext,
    pub db: Arc<MemoryDatabase>,
    pub events: Arc<RecordingPublisher>,
    pub alice: UserKey,
    pub bob: UserKey,
    pub admin: UserKey,
    pub dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let db = Arc::new(MemoryDatabase::new());
        let events = Arc::new(RecordingPublisher::default());
        let ctx = ServiceContext::builder()
            .memory(db.clone())
            .publisher(events.clone())
            .blob_store(Arc::new(LocalBlobStore::new(
                dir.path(),
                "test-bucket",
                1024,
            )))
            .jwt_service(Arc::new(JwtService::new("test-secret", 3600)))
            .build()
            .unwrap();

        Self {
            ctx,
            db,
            events,
            alice: key("alice@discover.test"),
            bob: key("bob@discover.test"),
            admin: key("admin@discover.local"),
            dir,
        }
    }

    /// Insert a block owned by `owner` directly through the repository
    pub async fn seed_block(&self, owner: &UserKey, title: &str) -> Block {
        let block = Block::new(
            self.ctx.generate_id(),
            owner.clone(),
            title.to_string(),
            format!("{title} description"),
        );
        BlockRepository::create(&*self.db, &block).await.unwrap();
        block
    }

    pub async fn block(&self, id: Snowflake) -> Option<Block> {
        BlockRepository::find_by_id(&*self.db, id).await.unwrap()
    }
}

pub fn key(raw: &str) -> UserKey {
    UserKey::parse(raw).unwrap()
}
