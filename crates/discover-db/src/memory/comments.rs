use async_trait::async_trait;

use discover_core::{Comment, CommentRepository, RepoResult, Snowflake};

use super::MemoryDatabase;

#[async_trait]
impl CommentRepository for MemoryDatabase {
    async fn find_by_id(
        &self,
        block_id: Snowflake,
        comment_id: Snowflake,
    ) -> RepoResult<Option<Comment>> {
        Ok(self
            .state
            .lock()
            .comments
            .get(&block_id)
            .and_then(|thread| thread.get(&comment_id))
            .cloned())
    }

    async fn list_recent(&self, block_id: Snowflake, limit: usize) -> RepoResult<Vec<Comment>> {
        let state = self.state.lock();
        let Some(thread) = state.comments.get(&block_id) else {
            return Ok(Vec::new());
        };

        let mut comments: Vec<Comment> = thread.values().cloned().collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        comments.truncate(limit);
        Ok(comments)
    }

    async fn count(&self, block_id: Snowflake) -> RepoResult<u64> {
        Ok(self
            .state
            .lock()
            .comments
            .get(&block_id)
            .map_or(0, |thread| thread.len() as u64))
    }

    async fn create(&self, comment: &Comment) -> RepoResult<()> {
        self.state
            .lock()
            .comments
            .entry(comment.block_id)
            .or_default()
            .insert(comment.id, comment.clone());
        Ok(())
    }

    async fn update(&self, comment: &Comment) -> RepoResult<()> {
        let mut state = self.state.lock();
        if let Some(existing) = state
            .comments
            .get_mut(&comment.block_id)
            .and_then(|thread| thread.get_mut(&comment.id))
        {
            existing.text.clone_from(&comment.text);
            existing.edited_at = comment.edited_at;
        }
        Ok(())
    }

    async fn delete(&self, block_id: Snowflake, comment_id: Snowflake) -> RepoResult<bool> {
        Ok(self
            .state
            .lock()
            .comments
            .get_mut(&block_id)
            .is_some_and(|thread| thread.remove(&comment_id).is_some()))
    }
}
