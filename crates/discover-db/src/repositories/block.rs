//! PostgreSQL implementation of BlockRepository

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use discover_core::{
    Block, BlockRepository, FeedOrder, FeedQuery, RepoResult, Snowflake,
};

use crate::models::{BlockModel, BLOCK_COLUMNS};

use super::error::{into_entities, map_db_error, sql_limit};

/// PostgreSQL implementation of BlockRepository
#[derive(Clone)]
pub struct PgBlockRepository {
    pool: PgPool,
}

impl PgBlockRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Build the keyset-paginated feed query
fn feed_sql(query: &FeedQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {BLOCK_COLUMNS} FROM global_blocks WHERE TRUE"));

    if let Some(bound) = query.created_after {
        qb.push(" AND created_at >= ").push_bind(bound);
    }

    if let Some(cursor) = query.start_after {
        match query.order {
            FeedOrder::ScoreDesc => {
                qb.push(" AND (score, id) < (")
                    .push_bind(cursor.score)
                    .push(", ")
                    .push_bind(cursor.id.into_inner())
                    .push(")");
            }
            FeedOrder::CreatedAtDesc => {
                qb.push(" AND (created_at, id) < (")
                    .push_bind(cursor.created_at)
                    .push(", ")
                    .push_bind(cursor.id.into_inner())
                    .push(")");
            }
        }
    }

    qb.push(match query.order {
        FeedOrder::ScoreDesc => " ORDER BY score DESC, id DESC",
        FeedOrder::CreatedAtDesc => " ORDER BY created_at DESC, id DESC",
    });
    qb.push(" LIMIT ").push_bind(sql_limit(query.limit));
    qb
}

#[async_trait]
impl BlockRepository for PgBlockRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Block>> {
        let row = sqlx::query_as::<_, BlockModel>(&format!(
            "SELECT {BLOCK_COLUMNS} FROM global_blocks WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(Block::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn query_feed(&self, query: &FeedQuery) -> RepoResult<Vec<Block>> {
        let rows = feed_sql(query)
            .build_query_as::<BlockModel>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        into_entities(rows)
    }

    #[instrument(skip(self, block), fields(block_id = %block.id))]
    async fn create(&self, block: &Block) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO global_blocks
                (id, owner_key, title, description, link, block_type, icon, image, slides,
                 created_at, upvotes, downvotes, score)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 0, 0, 0)
            "#,
        )
        .bind(block.id.into_inner())
        .bind(block.owner.as_str())
        .bind(&block.title)
        .bind(&block.description)
        .bind(&block.link)
        .bind(block.kind.as_str())
        .bind(&block.icon)
        .bind(&block.image)
        .bind(&block.slides)
        .bind(block.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, block), fields(block_id = %block.id))]
    async fn update(&self, block: &Block) -> RepoResult<()> {
        sqlx::query(
            r#"
            UPDATE global_blocks
            SET title = $2, description = $3, link = $4, block_type = $5,
                icon = $6, image = $7, slides = $8
            WHERE id = $1
            "#,
        )
        .bind(block.id.into_inner())
        .bind(&block.title)
        .bind(&block.description)
        .bind(&block.link)
        .bind(block.kind.as_str())
        .bind(&block.icon)
        .bind(&block.image)
        .bind(&block.slides)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<bool> {
        // votes and comments go with it through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM global_blocks WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
