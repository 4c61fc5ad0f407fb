//! PostgreSQL implementation of ProfileRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use discover_core::{ProfileRepository, RepoResult, UserKey, UserProfile};

use crate::mappers::{key_strings, stored_key};
use crate::models::ProfileModel;

use super::error::map_db_error;

const PROFILE_COLUMNS: &str =
    "user_key, numeric_id, title, avatar, connections, dismissed_requests, created_at, updated_at";

/// PostgreSQL implementation of ProfileRepository
#[derive(Clone)]
pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    #[instrument(skip(self))]
    async fn find_by_key(&self, key: &UserKey) -> RepoResult<Option<UserProfile>> {
        let row = sqlx::query_as::<_, ProfileModel>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM users WHERE user_key = $1"
        ))
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(UserProfile::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn create_for(&self, key: &UserKey) -> RepoResult<UserProfile> {
        // DO UPDATE with a no-op so RETURNING yields the row on conflict too
        let row = sqlx::query_as::<_, ProfileModel>(&format!(
            r#"
            INSERT INTO users (user_key, title)
            VALUES ($1, $2)
            ON CONFLICT (user_key) DO UPDATE SET user_key = EXCLUDED.user_key
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(key.as_str())
        .bind(key.local_part())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        UserProfile::try_from(row)
    }

    #[instrument(skip(self, profile), fields(user_key = %profile.key))]
    async fn update(&self, profile: &UserProfile) -> RepoResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET title = $2, avatar = $3, connections = $4, dismissed_requests = $5,
                updated_at = $6
            WHERE user_key = $1
            "#,
        )
        .bind(profile.key.as_str())
        .bind(&profile.title)
        .bind(&profile.avatar)
        .bind(key_strings(&profile.connections))
        .bind(key_strings(&profile.dismissed_requests))
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_keys(&self) -> RepoResult<Vec<UserKey>> {
        let keys = sqlx::query_scalar::<_, String>("SELECT user_key FROM users ORDER BY numeric_id")
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        keys.iter().map(|k| stored_key(k)).collect()
    }
}
