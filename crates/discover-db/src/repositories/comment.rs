//! PostgreSQL implementation of CommentRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use discover_core::{Comment, CommentRepository, RepoResult, Snowflake};

use crate::models::CommentModel;

use super::error::{into_entities, map_db_error, sql_limit};

/// PostgreSQL implementation of CommentRepository
#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    #[instrument(skip(self))]
    async fn find_by_id(
        &self,
        block_id: Snowflake,
        comment_id: Snowflake,
    ) -> RepoResult<Option<Comment>> {
        let row = sqlx::query_as::<_, CommentModel>(
            r#"
            SELECT id, block_id, author_key, text, created_at, edited_at
            FROM block_comments
            WHERE block_id = $1 AND id = $2
            "#,
        )
        .bind(block_id.into_inner())
        .bind(comment_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(Comment::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list_recent(&self, block_id: Snowflake, limit: usize) -> RepoResult<Vec<Comment>> {
        let rows = sqlx::query_as::<_, CommentModel>(
            r#"
            SELECT id, block_id, author_key, text, created_at, edited_at
            FROM block_comments
            WHERE block_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(block_id.into_inner())
        .bind(sql_limit(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        into_entities(rows)
    }

    #[instrument(skip(self))]
    async fn count(&self, block_id: Snowflake) -> RepoResult<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM block_comments WHERE block_id = $1",
        )
        .bind(block_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count.max(0) as u64)
    }

    #[instrument(skip(self, comment), fields(comment_id = %comment.id))]
    async fn create(&self, comment: &Comment) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO block_comments (id, block_id, author_key, text, created_at, edited_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(comment.id.into_inner())
        .bind(comment.block_id.into_inner())
        .bind(comment.author.as_str())
        .bind(&comment.text)
        .bind(comment.created_at)
        .bind(comment.edited_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, comment), fields(comment_id = %comment.id))]
    async fn update(&self, comment: &Comment) -> RepoResult<()> {
        sqlx::query(
            "UPDATE block_comments SET text = $3, edited_at = $4 WHERE block_id = $1 AND id = $2",
        )
        .bind(comment.block_id.into_inner())
        .bind(comment.id.into_inner())
        .bind(&comment.text)
        .bind(comment.edited_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, block_id: Snowflake, comment_id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM block_comments WHERE block_id = $1 AND id = $2")
            .bind(block_id.into_inner())
            .bind(comment_id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
