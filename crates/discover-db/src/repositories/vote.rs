//! PostgreSQL implementation of VoteRepository
//!
//! A vote is one transaction: the block row and the voter's vote row are both
//! locked with `FOR UPDATE`, so concurrent voters on the same block are
//! serialised on the block row and the counters never lose an update.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use discover_core::{
    RepoResult, Snowflake, UserKey, VoteOutcome, VoteRepository, VoteTally, VoteValue,
};

use super::error::map_db_error;

/// PostgreSQL implementation of VoteRepository
#[derive(Clone)]
pub struct PgVoteRepository {
    pool: PgPool,
}

impl PgVoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn stored_vote(raw: Option<i16>) -> RepoResult<VoteValue> {
    raw.map_or(Ok(VoteValue::Neutral), |v| VoteValue::try_from(i64::from(v)))
}

#[async_trait]
impl VoteRepository for PgVoteRepository {
    #[instrument(skip(self))]
    async fn find(&self, block_id: Snowflake, voter: &UserKey) -> RepoResult<Option<VoteValue>> {
        let value = sqlx::query_scalar::<_, i16>(
            "SELECT value FROM block_votes WHERE block_id = $1 AND voter_key = $2",
        )
        .bind(block_id.into_inner())
        .bind(voter.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        value.map(|v| stored_vote(Some(v))).transpose()
    }

    #[instrument(skip(self))]
    async fn cast(
        &self,
        block_id: Snowflake,
        voter: &UserKey,
        value: VoteValue,
    ) -> RepoResult<Option<VoteOutcome>> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let counters = sqlx::query_as::<_, (i64, i64)>(
            "SELECT upvotes, downvotes FROM global_blocks WHERE id = $1 FOR UPDATE",
        )
        .bind(block_id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let Some((upvotes, downvotes)) = counters else {
            tx.rollback().await.map_err(map_db_error)?;
            debug!("Block vanished before vote, nothing written");
            return Ok(None);
        };

        let previous = sqlx::query_scalar::<_, i16>(
            "SELECT value FROM block_votes WHERE block_id = $1 AND voter_key = $2 FOR UPDATE",
        )
        .bind(block_id.into_inner())
        .bind(voter.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;
        let previous = stored_vote(previous)?;

        let tally = VoteTally::new(upvotes, downvotes).apply(previous, value);

        sqlx::query(
            r#"
            INSERT INTO block_votes (block_id, voter_key, value, updated_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (block_id, voter_key)
            DO UPDATE SET value = EXCLUDED.value, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(block_id.into_inner())
        .bind(voter.as_str())
        .bind(value.as_i64() as i16)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        sqlx::query(
            "UPDATE global_blocks SET upvotes = $2, downvotes = $3, score = $4 WHERE id = $1",
        )
        .bind(block_id.into_inner())
        .bind(tally.upvotes)
        .bind(tally.downvotes)
        .bind(tally.score())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(Some(VoteOutcome {
            block_id,
            previous,
            current: value,
            tally,
        }))
    }
}
