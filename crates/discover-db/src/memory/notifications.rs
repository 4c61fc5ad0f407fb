use async_trait::async_trait;

use discover_core::{
    DomainError, Notification, NotificationRepository, RepoResult, SentNotification, Snowflake,
    UserKey, NOTIFICATION_BATCH_LIMIT,
};

use super::MemoryDatabase;

#[async_trait]
impl NotificationRepository for MemoryDatabase {
    async fn insert_batch(&self, batch: &[Notification]) -> RepoResult<()> {
        if batch.len() > NOTIFICATION_BATCH_LIMIT {
            return Err(DomainError::BatchTooLarge {
                max: NOTIFICATION_BATCH_LIMIT,
            });
        }
        self.state.lock().notifications.extend_from_slice(batch);
        Ok(())
    }

    async fn record_sent(&self, entry: &SentNotification) -> RepoResult<()> {
        self.state.lock().sent.push(entry.clone());
        Ok(())
    }

    async fn list_sent(&self, limit: usize) -> RepoResult<Vec<SentNotification>> {
        let state = self.state.lock();
        Ok(state.sent.iter().rev().take(limit).cloned().collect())
    }

    async fn list_for_user(
        &self,
        recipient: &UserKey,
        limit: usize,
    ) -> RepoResult<Vec<Notification>> {
        let state = self.state.lock();
        let mut inbox: Vec<Notification> = state
            .notifications
            .iter()
            .filter(|n| &n.recipient == recipient)
            .cloned()
            .collect();
        inbox.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        inbox.truncate(limit);
        Ok(inbox)
    }

    async fn mark_read(&self, recipient: &UserKey, id: Snowflake) -> RepoResult<bool> {
        let mut state = self.state.lock();
        match state
            .notifications
            .iter_mut()
            .find(|n| n.id == id && &n.recipient == recipient)
        {
            Some(n) => {
                n.read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
