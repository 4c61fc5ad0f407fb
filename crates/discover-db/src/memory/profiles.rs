use async_trait::async_trait;

use discover_core::{ProfileRepository, RepoResult, UserKey, UserProfile};

use super::MemoryDatabase;

#[async_trait]
impl ProfileRepository for MemoryDatabase {
    async fn find_by_key(&self, key: &UserKey) -> RepoResult<Option<UserProfile>> {
        Ok(self.state.lock().profiles.get(key).cloned())
    }

    async fn create_for(&self, key: &UserKey) -> RepoResult<UserProfile> {
        let mut state = self.state.lock();
        if let Some(existing) = state.profiles.get(key) {
            return Ok(existing.clone());
        }
        state.next_numeric_id += 1;
        let profile = UserProfile::new(key.clone(), state.next_numeric_id);
        state.profiles.insert(key.clone(), profile.clone());
        Ok(profile)
    }

    async fn update(&self, profile: &UserProfile) -> RepoResult<()> {
        let mut state = self.state.lock();
        if let Some(existing) = state.profiles.get_mut(&profile.key) {
            *existing = profile.clone();
        }
        Ok(())
    }

    async fn list_keys(&self) -> RepoResult<Vec<UserKey>> {
        let state = self.state.lock();
        let mut profiles: Vec<&UserProfile> = state.profiles.values().collect();
        profiles.sort_by_key(|p| p.numeric_id);
        Ok(profiles.into_iter().map(|p| p.key.clone()).collect())
    }
}
