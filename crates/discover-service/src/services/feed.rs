//! Feed service - builds feed queries, fetches a page and re-ranks it
//!
//! `relevant` re-ranks only the fetched page ([`RankScope::Page`]); the
//! cursor always follows the fetch order so paging stays consistent.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use discover_core::{
    rank_page, Block, FeedCursor, FeedQuery, RankScope, Snowflake, SortMode, TimeFilter,
};
use futures::future::join_all;
use tracing::{instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::pager::PageSource;

/// One block as it appears in a feed page
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub block: Block,
    /// Present when the page was ranked by relevance
    pub comment_count: Option<u64>,
    pub relevance: Option<f64>,
}

impl FeedItem {
    pub fn plain(block: Block) -> Self {
        Self {
            block,
            comment_count: None,
            relevance: None,
        }
    }
}

/// A fetched page plus the cursor for the page after it
#[derive(Debug, Clone, PartialEq)]
pub struct FeedPage {
    pub items: Vec<FeedItem>,
    pub next_cursor: Option<FeedCursor>,
    /// A full page came back, so another may follow
    pub has_more: bool,
    pub rank_scope: Option<RankScope>,
}

pub struct FeedService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> FeedService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Query for one page with the configured page size
    pub fn build_query(
        &self,
        sort: SortMode,
        time: TimeFilter,
        cursor: Option<FeedCursor>,
        now: DateTime<Utc>,
    ) -> FeedQuery {
        FeedQuery::build(sort, time, now)
            .with_limit(self.ctx.page_size())
            .with_cursor(cursor)
    }

    #[instrument(skip(self))]
    pub async fn fetch_page(
        &self,
        sort: SortMode,
        time: TimeFilter,
        cursor: Option<FeedCursor>,
    ) -> ServiceResult<FeedPage> {
        let now = Utc::now();
        let query = self.build_query(sort, time, cursor, now);
        self.fetch(&query, now).await
    }

    /// Run a built query, re-ranking the result when the query asks for it
    pub async fn fetch(&self, query: &FeedQuery, now: DateTime<Utc>) -> ServiceResult<FeedPage> {
        let blocks = self.ctx.block_repo().query_feed(query).await?;
        let has_more = blocks.len() >= query.limit;
        let next_cursor = blocks.last().map(FeedCursor::from_block);
        let rank_scope = query.rank_scope();

        let items = match rank_scope {
            Some(RankScope::Page) => self.rank(blocks, now).await,
            None => blocks.into_iter().map(FeedItem::plain).collect(),
        };

        Ok(FeedPage {
            items,
            next_cursor,
            has_more,
            rank_scope,
        })
    }

    async fn rank(&self, blocks: Vec<Block>, now: DateTime<Utc>) -> Vec<FeedItem> {
        let counts = join_all(blocks.iter().map(|b| self.comment_count(b.id))).await;
        rank_page(blocks.into_iter().zip(counts).collect(), now)
            .into_iter()
            .map(|ranked| FeedItem {
                block: ranked.block,
                comment_count: Some(ranked.comment_count),
                relevance: Some(ranked.relevance),
            })
            .collect()
    }

    /// Comment count for ranking; a failed read counts as zero
    async fn comment_count(&self, block_id: Snowflake) -> u64 {
        match self.ctx.comment_repo().count(block_id).await {
            Ok(count) => count,
            Err(e) => {
                warn!(block_id = %block_id, error = %e, "Comment count failed, ranking with 0");
                0
            }
        }
    }
}

/// [`PageSource`] backed by the feed service; owns its context so pagers can
/// outlive a request
#[derive(Clone)]
pub struct FeedSource {
    ctx: ServiceContext,
}

impl FeedSource {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl PageSource for FeedSource {
    async fn fetch(
        &self,
        sort: SortMode,
        time: TimeFilter,
        cursor: Option<FeedCursor>,
    ) -> ServiceResult<FeedPage> {
        FeedService::new(&self.ctx).fetch_page(sort, time, cursor).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::TestEnv;
    use async_trait::async_trait;
    use chrono::Duration;
    use discover_core::{
        BlockRepository, Comment, CommentRepository, DomainError, RepoResult, VoteRepository,
        VoteValue,
    };
    use std::sync::Arc;

    async fn seed_aged(env: &TestEnv, title: &str, hours: i64) -> Block {
        let mut block = Block::new(
            env.ctx.generate_id(),
            env.alice.clone(),
            title.to_string(),
            String::new(),
        );
        block.created_at = Utc::now() - Duration::hours(hours);
        BlockRepository::create(&*env.db, &block).await.unwrap();
        block
    }

    #[tokio::test]
    async fn test_recent_week_query_shape() {
        let env = TestEnv::new();
        let now = Utc::now();
        let query = FeedService::new(&env.ctx).build_query(
            SortMode::Recent,
            TimeFilter::Week,
            None,
            now,
        );
        assert_eq!(query.created_after, Some(now - Duration::days(7)));
        assert_eq!(query.limit, 10);
        assert!(query.rank_scope().is_none());
    }

    #[tokio::test]
    async fn test_votes_sort_orders_by_score() {
        let env = TestEnv::new();
        let low = seed_aged(&env, "low", 1).await;
        let high = seed_aged(&env, "high", 2).await;
        env.db.cast(high.id, &env.bob, VoteValue::Up).await.unwrap();
        env.db.cast(low.id, &env.bob, VoteValue::Down).await.unwrap();

        let page = FeedService::new(&env.ctx)
            .fetch_page(SortMode::Votes, TimeFilter::All, None)
            .await
            .unwrap();
        let titles: Vec<_> = page.items.iter().map(|i| i.block.title.as_str()).collect();
        assert_eq!(titles, ["high", "low"]);
        assert!(!page.has_more);
    }

    #[tokio::test]
    async fn test_relevant_ranks_within_page() {
        let env = TestEnv::new();
        // Newest block, no activity: bonus 36
        seed_aged(&env, "fresh", 0).await;
        // Older block with votes and comments: 5 + 3 + bonus 12
        let busy = seed_aged(&env, "busy", 48).await;
        for voter in ["a@x.io", "b@x.io", "c@x.io", "d@x.io", "e@x.io"] {
            let voter = discover_core::UserKey::parse(voter).unwrap();
            env.db.cast(busy.id, &voter, VoteValue::Up).await.unwrap();
        }
        for i in 0..3 {
            let c = Comment::new(env.ctx.generate_id(), busy.id, env.bob.clone(), format!("{i}"));
            CommentRepository::create(&*env.db, &c).await.unwrap();
        }
        // Past the window: score only
        let stale = seed_aged(&env, "stale", 100).await;

        let page = FeedService::new(&env.ctx)
            .fetch_page(SortMode::Relevant, TimeFilter::All, None)
            .await
            .unwrap();
        let titles: Vec<_> = page.items.iter().map(|i| i.block.title.as_str()).collect();
        assert_eq!(titles, ["fresh", "busy", "stale"]);
        assert_eq!(page.items[1].comment_count, Some(3));
        assert_eq!(page.rank_scope, Some(RankScope::Page));

        // Cursor is the oldest fetched block whatever the ranked order
        assert_eq!(page.next_cursor.unwrap().id, stale.id);
    }

    struct FailingCounts(Arc<discover_db::MemoryDatabase>);

    #[async_trait]
    impl CommentRepository for FailingCounts {
        async fn find_by_id(&self, b: Snowflake, c: Snowflake) -> RepoResult<Option<Comment>> {
            CommentRepository::find_by_id(&*self.0, b, c).await
        }
        async fn list_recent(&self, b: Snowflake, limit: usize) -> RepoResult<Vec<Comment>> {
            self.0.list_recent(b, limit).await
        }
        async fn count(&self, _b: Snowflake) -> RepoResult<u64> {
            Err(DomainError::DatabaseError("count unavailable".into()))
        }
        async fn create(&self, c: &Comment) -> RepoResult<()> {
            CommentRepository::create(&*self.0, c).await
        }
        async fn update(&self, c: &Comment) -> RepoResult<()> {
            CommentRepository::update(&*self.0, c).await
        }
        async fn delete(&self, b: Snowflake, c: Snowflake) -> RepoResult<bool> {
            CommentRepository::delete(&*self.0, b, c).await
        }
    }

    #[tokio::test]
    async fn test_failed_count_ranks_as_zero() {
        let env = TestEnv::new();
        seed_aged(&env, "only", 10).await;
        let ctx = ServiceContext::builder()
            .memory(env.db.clone())
            .comment_repo(Arc::new(FailingCounts(env.db.clone())))
            .blob_store(Arc::new(discover_db::LocalBlobStore::new("unused", "b", 1)))
            .jwt_service(Arc::new(discover_common::JwtService::new("s", 60)))
            .build()
            .unwrap();

        let page = FeedService::new(&ctx)
            .fetch_page(SortMode::Relevant, TimeFilter::All, None)
            .await
            .unwrap();
        assert_eq!(page.items[0].comment_count, Some(0));
    }

    #[tokio::test]
    async fn test_time_filter_excludes_old_blocks() {
        let env = TestEnv::new();
        seed_aged(&env, "new", 2).await;
        seed_aged(&env, "old", 24 * 10).await;

        let page = FeedService::new(&env.ctx)
            .fetch_page(SortMode::Recent, TimeFilter::Week, None)
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].block.title, "new");
    }
}
