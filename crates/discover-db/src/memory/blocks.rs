use async_trait::async_trait;

use discover_core::{Block, BlockRepository, FeedQuery, RepoResult, Snowflake};

use super::MemoryDatabase;

#[async_trait]
impl BlockRepository for MemoryDatabase {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Block>> {
        Ok(self.state.lock().blocks.get(&id).cloned())
    }

    async fn query_feed(&self, query: &FeedQuery) -> RepoResult<Vec<Block>> {
        let state = self.state.lock();
        let mut page: Vec<Block> = state
            .blocks
            .values()
            .filter(|b| query.admits(b))
            .cloned()
            .collect();
        drop(state);

        page.sort_by(|a, b| query.compare(a, b));
        page.truncate(query.limit);
        Ok(page)
    }

    async fn create(&self, block: &Block) -> RepoResult<()> {
        let mut stored = block.clone();
        stored.set_tally(discover_core::VoteTally::default());
        self.state.lock().blocks.insert(block.id, stored);
        Ok(())
    }

    async fn update(&self, block: &Block) -> RepoResult<()> {
        let mut state = self.state.lock();
        if let Some(existing) = state.blocks.get_mut(&block.id) {
            existing.title.clone_from(&block.title);
            existing.description.clone_from(&block.description);
            existing.link.clone_from(&block.link);
            existing.kind = block.kind;
            existing.icon.clone_from(&block.icon);
            existing.image.clone_from(&block.image);
            existing.slides.clone_from(&block.slides);
        }
        Ok(())
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<bool> {
        let mut state = self.state.lock();
        let existed = state.blocks.remove(&id).is_some();
        state.votes.retain(|(block_id, _), _| *block_id != id);
        state.comments.remove(&id);
        Ok(existed)
    }
}
