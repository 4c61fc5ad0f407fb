//! Vote ledger service
//!
//! One transaction per vote in the repository: the previous value comes from
//! the voter's own row, never from the caller.

use chrono::Utc;
use discover_core::events::BlockVotedEvent;
use discover_core::{FeedEvent, Snowflake, UserKey, VoteOutcome, VoteValue};
use tracing::{info, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct VoteService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> VoteService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Set the viewer's vote to `value`
    ///
    /// Returns `Ok(None)` when there is no viewer or the block no longer exists.
    #[instrument(skip(self))]
    pub async fn cast_vote(
        &self,
        viewer: Option<&UserKey>,
        block_id: Snowflake,
        value: VoteValue,
    ) -> ServiceResult<Option<VoteOutcome>> {
        let Some(voter) = viewer else {
            return Ok(None);
        };

        let Some(outcome) = self.ctx.vote_repo().cast(block_id, voter, value).await? else {
            info!(block_id = %block_id, "Vote dropped, block no longer exists");
            return Ok(None);
        };

        info!(
            block_id = %block_id,
            voter = %voter,
            previous = outcome.previous.as_i64(),
            current = outcome.current.as_i64(),
            score = outcome.score(),
            "Vote recorded"
        );

        self.ctx
            .publish(FeedEvent::BlockVoted(BlockVotedEvent {
                block_id,
                voter: voter.clone(),
                value: outcome.current,
                tally: outcome.tally,
                score: outcome.score(),
                timestamp: Utc::now(),
            }))
            .await;

        Ok(Some(outcome))
    }

    /// Vote button click: the active direction clears, anything else sets it
    #[instrument(skip(self))]
    pub async fn toggle_vote(
        &self,
        viewer: Option<&UserKey>,
        block_id: Snowflake,
        direction: VoteValue,
    ) -> ServiceResult<Option<VoteOutcome>> {
        let Some(voter) = viewer else {
            return Ok(None);
        };
        let current = self.viewer_vote(Some(voter), block_id).await?;
        self.cast_vote(Some(voter), block_id, current.toggled(direction))
            .await
    }

    /// The viewer's current vote; neutral when absent or signed out
    pub async fn viewer_vote(
        &self,
        viewer: Option<&UserKey>,
        block_id: Snowflake,
    ) -> ServiceResult<VoteValue> {
        match viewer {
            Some(voter) => Ok(self
                .ctx
                .vote_repo()
                .find(block_id, voter)
                .await?
                .unwrap_or(VoteValue::Neutral)),
            None => Ok(VoteValue::Neutral),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{key, TestEnv};
    use discover_core::VoteTally;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_sequence_ends_at_latest_value() {
        let env = TestEnv::new();
        let block = env.seed_block(&env.alice, "post").await;
        let votes = VoteService::new(&env.ctx);

        for value in [VoteValue::Up, VoteValue::Down, VoteValue::Neutral, VoteValue::Up] {
            let outcome = votes
                .cast_vote(Some(&env.bob), block.id, value)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(outcome.score(), outcome.tally.upvotes - outcome.tally.downvotes);

            let stored = env.block(block.id).await.unwrap();
            assert_eq!(stored.score, stored.upvotes - stored.downvotes);
        }

        let stored = env.block(block.id).await.unwrap();
        assert_eq!(stored.tally(), VoteTally::new(1, 0));
        assert_eq!(stored.score, 1);
        assert_eq!(env.events.types().len(), 4);
    }

    #[tokio::test]
    async fn test_signed_out_vote_is_noop() {
        let env = TestEnv::new();
        let block = env.seed_block(&env.alice, "post").await;

        let outcome = VoteService::new(&env.ctx)
            .cast_vote(None, block.id, VoteValue::Up)
            .await
            .unwrap();
        assert!(outcome.is_none());
        assert_eq!(env.block(block.id).await.unwrap().upvotes, 0);
        assert!(env.events.types().is_empty());
    }

    #[tokio::test]
    async fn test_vote_on_missing_block_is_silent() {
        let env = TestEnv::new();
        let outcome = VoteService::new(&env.ctx)
            .cast_vote(Some(&env.bob), Snowflake::new(404), VoteValue::Up)
            .await
            .unwrap();
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn test_toggle_up_up_down() {
        let env = TestEnv::new();
        let block = env.seed_block(&env.alice, "post").await;
        let votes = VoteService::new(&env.ctx);
        let viewer = Some(&env.bob);

        let first = votes.toggle_vote(viewer, block.id, VoteValue::Up).await.unwrap();
        assert_eq!(first.unwrap().current, VoteValue::Up);

        let second = votes.toggle_vote(viewer, block.id, VoteValue::Up).await.unwrap();
        assert_eq!(second.unwrap().current, VoteValue::Neutral);

        let third = votes.toggle_vote(viewer, block.id, VoteValue::Down).await.unwrap();
        let third = third.unwrap();
        assert_eq!(third.current, VoteValue::Down);
        assert_eq!(third.score(), -1);

        assert_eq!(
            votes.viewer_vote(viewer, block.id).await.unwrap(),
            VoteValue::Down
        );
    }

    #[tokio::test]
    async fn test_concurrent_voters_keep_counts_consistent() {
        let env = TestEnv::new();
        let block = env.seed_block(&env.alice, "post").await;
        let ctx = Arc::new(env.ctx.clone());

        let mut handles = Vec::new();
        for i in 0..30 {
            let ctx = ctx.clone();
            handles.push(tokio::spawn(async move {
                let voter = key(&format!("voter{i}@x.io"));
                let value = if i % 3 == 0 { VoteValue::Down } else { VoteValue::Up };
                VoteService::new(&ctx)
                    .cast_vote(Some(&voter), block.id, value)
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let stored = env.block(block.id).await.unwrap();
        assert_eq!(stored.tally(), VoteTally::new(20, 10));
        assert_eq!(stored.score, 10);
    }
}
