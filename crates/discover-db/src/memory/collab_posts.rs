use async_trait::async_trait;

use discover_core::{CollabPost, CollabPostRepository, RepoResult, Snowflake};

use super::MemoryDatabase;

#[async_trait]
impl CollabPostRepository for MemoryDatabase {
    async fn list(&self, limit: usize) -> RepoResult<Vec<CollabPost>> {
        let state = self.state.lock();
        let mut posts: Vec<CollabPost> = state.collab_posts.values().cloned().collect();
        drop(state);
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        posts.truncate(limit);
        Ok(posts)
    }

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<CollabPost>> {
        Ok(self.state.lock().collab_posts.get(&id).cloned())
    }

    async fn create(&self, post: &CollabPost) -> RepoResult<()> {
        self.state.lock().collab_posts.insert(post.id, post.clone());
        Ok(())
    }

    async fn update(&self, post: &CollabPost) -> RepoResult<()> {
        let mut state = self.state.lock();
        if let Some(existing) = state.collab_posts.get_mut(&post.id) {
            existing.title.clone_from(&post.title);
            existing.description.clone_from(&post.description);
            existing.link.clone_from(&post.link);
        }
        Ok(())
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<bool> {
        Ok(self.state.lock().collab_posts.remove(&id).is_some())
    }
}
