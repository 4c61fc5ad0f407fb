//! Service context - dependency container for services
//!
//! Holds the repositories, the event publisher, the blob store and the
//! identity settings every service needs.

use std::sync::Arc;

use discover_cache::RedisPool;
use discover_common::auth::JwtService;
use discover_common::DEFAULT_ADMIN_EMAIL;
use discover_core::{
    BlobStore, BlockRepository, CollabPostRepository, CommentRepository, EventPublisher,
    FeedEvent, NoopPublisher, NotificationRepository, ProfileRepository, Snowflake,
    SnowflakeGenerator, UserKey, VoteRepository, FEED_PAGE_SIZE,
};
use discover_db::{
    MemoryDatabase, PgBlockRepository, PgCollabPostRepository, PgCommentRepository,
    PgNotificationRepository, PgPool, PgProfileRepository, PgVoteRepository,
};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// Cheap to clone; every dependency sits behind an `Arc`.
#[derive(Clone)]
pub struct ServiceContext {
    // None when running on the in-memory backend
    pool: Option<PgPool>,
    redis_pool: Option<RedisPool>,

    block_repo: Arc<dyn BlockRepository>,
    vote_repo: Arc<dyn VoteRepository>,
    comment_repo: Arc<dyn CommentRepository>,
    profile_repo: Arc<dyn ProfileRepository>,
    notification_repo: Arc<dyn NotificationRepository>,
    collab_repo: Arc<dyn CollabPostRepository>,

    publisher: Arc<dyn EventPublisher>,
    blob_store: Arc<dyn BlobStore>,

    jwt_service: Arc<JwtService>,
    snowflake_generator: Arc<SnowflakeGenerator>,
    admin: UserKey,
    page_size: usize,
}

impl ServiceContext {
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Backends ===

    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    pub fn redis_pool(&self) -> Option<&RedisPool> {
        self.redis_pool.as_ref()
    }

    // === Repositories ===

    pub fn block_repo(&self) -> &dyn BlockRepository {
        self.block_repo.as_ref()
    }

    pub fn vote_repo(&self) -> &dyn VoteRepository {
        self.vote_repo.as_ref()
    }

    pub fn comment_repo(&self) -> &dyn CommentRepository {
        self.comment_repo.as_ref()
    }

    pub fn profile_repo(&self) -> &dyn ProfileRepository {
        self.profile_repo.as_ref()
    }

    pub fn notification_repo(&self) -> &dyn NotificationRepository {
        self.notification_repo.as_ref()
    }

    pub fn collab_repo(&self) -> &dyn CollabPostRepository {
        self.collab_repo.as_ref()
    }

    // === Ports ===

    pub fn blob_store(&self) -> &dyn BlobStore {
        self.blob_store.as_ref()
    }

    /// Publish a feed event; failures are logged and dropped
    pub async fn publish(&self, event: FeedEvent) {
        if let Err(e) = self.publisher.publish(&event).await {
            tracing::warn!(
                error = %e,
                event_type = event.event_type(),
                "Failed to publish feed event"
            );
        }
    }

    // === Identity ===

    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    pub fn admin(&self) -> &UserKey {
        &self.admin
    }

    pub fn is_admin(&self, key: &UserKey) -> bool {
        key == &self.admin
    }

    // === Settings ===

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("backend", &if self.pool.is_some() { "postgres" } else { "memory" })
            .field("redis", &self.redis_pool.is_some())
            .field("admin", &self.admin)
            .field("page_size", &self.page_size)
            .finish()
    }
}

/// Builder for creating a [`ServiceContext`]
#[derive(Default)]
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    redis_pool: Option<RedisPool>,
    block_repo: Option<Arc<dyn BlockRepository>>,
    vote_repo: Option<Arc<dyn VoteRepository>>,
    comment_repo: Option<Arc<dyn CommentRepository>>,
    profile_repo: Option<Arc<dyn ProfileRepository>>,
    notification_repo: Option<Arc<dyn NotificationRepository>>,
    collab_repo: Option<Arc<dyn CollabPostRepository>>,
    publisher: Option<Arc<dyn EventPublisher>>,
    blob_store: Option<Arc<dyn BlobStore>>,
    jwt_service: Option<Arc<JwtService>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    admin: Option<UserKey>,
    page_size: Option<usize>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use PostgreSQL repositories over `pool`
    pub fn postgres(mut self, pool: PgPool) -> Self {
        self.block_repo = Some(Arc::new(PgBlockRepository::new(pool.clone())));
        self.vote_repo = Some(Arc::new(PgVoteRepository::new(pool.clone())));
        self.comment_repo = Some(Arc::new(PgCommentRepository::new(pool.clone())));
        self.profile_repo = Some(Arc::new(PgProfileRepository::new(pool.clone())));
        self.notification_repo = Some(Arc::new(PgNotificationRepository::new(pool.clone())));
        self.collab_repo = Some(Arc::new(PgCollabPostRepository::new(pool.clone())));
        self.pool = Some(pool);
        self
    }

    /// Use one shared in-memory database for every repository
    pub fn memory(mut self, db: Arc<MemoryDatabase>) -> Self {
        self.block_repo = Some(db.clone());
        self.vote_repo = Some(db.clone());
        self.comment_repo = Some(db.clone());
        self.profile_repo = Some(db.clone());
        self.notification_repo = Some(db.clone());
        self.collab_repo = Some(db);
        self.pool = None;
        self
    }

    pub fn redis_pool(mut self, redis_pool: RedisPool) -> Self {
        self.redis_pool = Some(redis_pool);
        self
    }

    pub fn block_repo(mut self, repo: Arc<dyn BlockRepository>) -> Self {
        self.block_repo = Some(repo);
        self
    }

    pub fn comment_repo(mut self, repo: Arc<dyn CommentRepository>) -> Self {
        self.comment_repo = Some(repo);
        self
    }

    pub fn profile_repo(mut self, repo: Arc<dyn ProfileRepository>) -> Self {
        self.profile_repo = Some(repo);
        self
    }

    pub fn publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    pub fn blob_store(mut self, store: Arc<dyn BlobStore>) -> Self {
        self.blob_store = Some(store);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn admin(mut self, admin: UserKey) -> Self {
        self.admin = Some(admin);
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if a required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let admin = match self.admin {
            Some(admin) => admin,
            None => UserKey::parse(DEFAULT_ADMIN_EMAIL)?,
        };

        Ok(ServiceContext {
            pool: self.pool,
            redis_pool: self.redis_pool,
            block_repo: required(self.block_repo, "block_repo")?,
            vote_repo: required(self.vote_repo, "vote_repo")?,
            comment_repo: required(self.comment_repo, "comment_repo")?,
            profile_repo: required(self.profile_repo, "profile_repo")?,
            notification_repo: required(self.notification_repo, "notification_repo")?,
            collab_repo: required(self.collab_repo, "collab_repo")?,
            publisher: self.publisher.unwrap_or_else(|| Arc::new(NoopPublisher)),
            blob_store: required(self.blob_store, "blob_store")?,
            jwt_service: required(self.jwt_service, "jwt_service")?,
            snowflake_generator: self
                .snowflake_generator
                .unwrap_or_else(|| Arc::new(SnowflakeGenerator::default())),
            admin,
            page_size: self.page_size.unwrap_or(FEED_PAGE_SIZE).max(1),
        })
    }
}

fn required<T>(value: Option<T>, name: &str) -> ServiceResult<T> {
    value.ok_or_else(|| ServiceError::validation(format!("{name} is required")))
}
