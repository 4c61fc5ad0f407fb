use async_trait::async_trait;

use discover_core::{RepoResult, Snowflake, UserKey, VoteOutcome, VoteRepository, VoteValue};

use super::MemoryDatabase;

#[async_trait]
impl VoteRepository for MemoryDatabase {
    async fn find(&self, block_id: Snowflake, voter: &UserKey) -> RepoResult<Option<VoteValue>> {
        Ok(self
            .state
            .lock()
            .votes
            .get(&(block_id, voter.clone()))
            .copied())
    }

    async fn cast(
        &self,
        block_id: Snowflake,
        voter: &UserKey,
        value: VoteValue,
    ) -> RepoResult<Option<VoteOutcome>> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let vote_key = (block_id, voter.clone());
        let previous = state.votes.get(&vote_key).copied().unwrap_or_default();

        let Some(block) = state.blocks.get_mut(&block_id) else {
            return Ok(None);
        };
        let tally = block.tally().apply(previous, value);
        block.set_tally(tally);
        state.votes.insert(vote_key, value);

        Ok(Some(VoteOutcome {
            block_id,
            previous,
            current: value,
            tally,
        }))
    }
}
