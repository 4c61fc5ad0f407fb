//! PostgreSQL implementation of CollabPostRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use discover_core::{CollabPost, CollabPostRepository, RepoResult, Snowflake};

use crate::models::CollabPostModel;

use super::error::{into_entities, map_db_error, sql_limit};

/// PostgreSQL implementation of CollabPostRepository
#[derive(Clone)]
pub struct PgCollabPostRepository {
    pool: PgPool,
}

impl PgCollabPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CollabPostRepository for PgCollabPostRepository {
    #[instrument(skip(self))]
    async fn list(&self, limit: usize) -> RepoResult<Vec<CollabPost>> {
        let rows = sqlx::query_as::<_, CollabPostModel>(
            r#"
            SELECT id, owner_key, title, description, link, created_at
            FROM collab_posts
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(sql_limit(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        into_entities(rows)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<CollabPost>> {
        let row = sqlx::query_as::<_, CollabPostModel>(
            "SELECT id, owner_key, title, description, link, created_at FROM collab_posts WHERE id = $1",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(CollabPost::try_from).transpose()
    }

    #[instrument(skip(self, post), fields(id = %post.id))]
    async fn create(&self, post: &CollabPost) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO collab_posts (id, owner_key, title, description, link, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(post.id.into_inner())
        .bind(post.owner.as_str())
        .bind(&post.title)
        .bind(&post.description)
        .bind(&post.link)
        .bind(post.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, post), fields(id = %post.id))]
    async fn update(&self, post: &CollabPost) -> RepoResult<()> {
        sqlx::query("UPDATE collab_posts SET title = $2, description = $3, link = $4 WHERE id = $1")
            .bind(post.id.into_inner())
            .bind(&post.title)
            .bind(&post.description)
            .bind(&post.link)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM collab_posts WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
