//! PostgreSQL implementation of NotificationRepository

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use discover_core::{
    DomainError, Notification, NotificationRepository, RepoResult, SentNotification, Snowflake,
    UserKey, NOTIFICATION_BATCH_LIMIT,
};

use crate::models::{NotificationModel, SentNotificationModel};

use super::error::{into_entities, map_db_error, sql_limit};

/// PostgreSQL implementation of NotificationRepository
#[derive(Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    #[instrument(skip(self, batch), fields(size = batch.len()))]
    async fn insert_batch(&self, batch: &[Notification]) -> RepoResult<()> {
        if batch.len() > NOTIFICATION_BATCH_LIMIT {
            return Err(DomainError::BatchTooLarge {
                max: NOTIFICATION_BATCH_LIMIT,
            });
        }
        if batch.is_empty() {
            return Ok(());
        }

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO user_notifications (id, recipient_key, sender_key, message, link, created_at, read) ",
        );
        qb.push_values(batch, |mut row, n| {
            row.push_bind(n.id.into_inner())
                .push_bind(n.recipient.as_str())
                .push_bind(n.sender.as_str())
                .push_bind(&n.message)
                .push_bind(&n.link)
                .push_bind(n.created_at)
                .push_bind(n.read);
        });

        qb.build()
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, entry), fields(id = %entry.id))]
    async fn record_sent(&self, entry: &SentNotification) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sent_notifications (id, sender_key, message, link, recipient_count, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(entry.id.into_inner())
        .bind(entry.sender.as_str())
        .bind(&entry.message)
        .bind(&entry.link)
        .bind(entry.recipient_count)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_sent(&self, limit: usize) -> RepoResult<Vec<SentNotification>> {
        let rows = sqlx::query_as::<_, SentNotificationModel>(
            r#"
            SELECT id, sender_key, message, link, recipient_count, created_at
            FROM sent_notifications
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
    async fn list_for_user(
        &self,
        recipient: &UserKey,
        limit: usize,
    ) -> RepoResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, NotificationModel>(
            r#"
            SELECT id, recipient_key, sender_key, message, link, created_at, read
            FROM user_notifications
            WHERE recipient_key = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(recipient.as_str())
        .bind(sql_limit(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        into_entities(rows)
    }

    #[instrument(skip(self))]
    async fn mark_read(&self, recipient: &UserKey, id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query(
            "UPDATE user_notifications SET read = TRUE WHERE recipient_key = $1 AND id = $2",
        )
        .bind(recipient.as_str())
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
