//! Notification service
//!
//! The admin broadcasts a message to every profile (or an explicit list).
//! Inbox entries are written in batches no larger than the store accepts,
//! then one send-log entry records the fan-out.

use std::collections::BTreeSet;

use chrono::Utc;
use discover_core::{
    Notification, SentNotification, Snowflake, UserKey, NOTIFICATION_BATCH_LIMIT,
};
use tracing::{debug, info, instrument};
use validator::Validate;

use crate::dto::BroadcastRequest;

use super::access::require_admin;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

pub const DEFAULT_INBOX_LIMIT: usize = 50;
const MAX_INBOX_LIMIT: usize = 200;

/// Result of one broadcast
#[derive(Debug, Clone)]
pub struct BroadcastOutcome {
    pub sent: SentNotification,
    pub batches: usize,
}

pub struct NotificationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> NotificationService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Fan a message out to recipients; admin only
    #[instrument(skip(self, request), fields(message_len = request.message.len()))]
    pub async fn broadcast(
        &self,
        viewer: &UserKey,
        request: BroadcastRequest,
    ) -> ServiceResult<BroadcastOutcome> {
        require_admin(self.ctx, viewer, "send notifications")?;
        request.validate()?;

        let recipients = match request.recipients {
            Some(raw) => raw
                .iter()
                .map(|r| UserKey::parse(r))
                .collect::<Result<BTreeSet<_>, _>>()?,
            None => self
                .ctx
                .profile_repo()
                .list_keys()
                .await?
                .into_iter()
                .collect(),
        };

        let message = request.message.trim().to_string();
        let link = request.link.filter(|l| !l.trim().is_empty());
        let now = Utc::now();

        let notifications: Vec<Notification> = recipients
            .into_iter()
            .map(|recipient| Notification {
                id: self.ctx.generate_id(),
                recipient,
                sender: viewer.clone(),
                message: message.clone(),
                link: link.clone(),
                created_at: now,
                read: false,
            })
            .collect();

        let mut batches = 0;
        for chunk in notifications.chunks(NOTIFICATION_BATCH_LIMIT) {
            self.ctx.notification_repo().insert_batch(chunk).await?;
            batches += 1;
            debug!(batch = batches, size = chunk.len(), "Notification batch written");
        }

        let sent = SentNotification {
            id: self.ctx.generate_id(),
            sender: viewer.clone(),
            message,
            link,
            recipient_count: notifications.len() as i64,
            created_at: now,
        };
        self.ctx.notification_repo().record_sent(&sent).await?;

        info!(
            sent_id = %sent.id,
            recipients = sent.recipient_count,
            batches,
            "Notification broadcast"
        );
        Ok(BroadcastOutcome { sent, batches })
    }

    /// The viewer's inbox, newest first
    pub async fn list_for_user(
        &self,
        viewer: &UserKey,
        limit: Option<usize>,
    ) -> ServiceResult<Vec<Notification>> {
        let limit = limit.unwrap_or(DEFAULT_INBOX_LIMIT).clamp(1, MAX_INBOX_LIMIT);
        Ok(self
            .ctx
            .notification_repo()
            .list_for_user(viewer, limit)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn mark_read(&self, viewer: &UserKey, id: Snowflake) -> ServiceResult<()> {
        if self.ctx.notification_repo().mark_read(viewer, id).await? {
            Ok(())
        } else {
            Err(ServiceError::not_found("Notification", id))
        }
    }

    /// Send log; admin only
    pub async fn list_sent(
        &self,
        viewer: &UserKey,
        limit: Option<usize>,
    ) -> ServiceResult<Vec<SentNotification>> {
        require_admin(self.ctx, viewer, "view sent notifications")?;
        let limit = limit.unwrap_or(DEFAULT_INBOX_LIMIT).clamp(1, MAX_INBOX_LIMIT);
        Ok(self.ctx.notification_repo().list_sent(limit).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{key, TestEnv};
    use discover_core::ProfileRepository;

    fn request(message: &str, recipients: Option<Vec<&str>>) -> BroadcastRequest {
        BroadcastRequest {
            message: message.to_string(),
            link: None,
            recipients: recipients.map(|r| r.into_iter().map(String::from).collect()),
        }
    }

    #[tokio::test]
    async fn test_broadcast_is_admin_only() {
        let env = TestEnv::new();
        let err = NotificationService::new(&env.ctx)
            .broadcast(&env.alice, request("hi", None))
            .await
            .unwrap_err();
        assert!(err.is_permission_denied());
    }

    #[tokio::test]
    async fn test_broadcast_to_every_profile() {
        let env = TestEnv::new();
        for user in [&env.alice, &env.bob] {
            ProfileRepository::create_for(&*env.db, user).await.unwrap();
        }
        let svc = NotificationService::new(&env.ctx);

        let outcome = svc
            .broadcast(&env.admin, request("  Welcome!  ", None))
            .await
            .unwrap();
        assert_eq!(outcome.sent.recipient_count, 2);
        assert_eq!(outcome.batches, 1);

        let inbox = svc.list_for_user(&env.bob, None).await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].message, "Welcome!");
        assert!(!inbox[0].read);

        svc.mark_read(&env.bob, inbox[0].id).await.unwrap();
        assert!(svc.list_for_user(&env.bob, None).await.unwrap()[0].read);

        // someone else's notification id is not found
        let err = svc.mark_read(&env.alice, inbox[0].id).await.unwrap_err();
        assert_eq!(err.status_code(), 404);

        let log = svc.list_sent(&env.admin, None).await.unwrap();
        assert_eq!(log.len(), 1);
        assert!(svc.list_sent(&env.bob, None).await.is_err());
    }

    #[tokio::test]
    async fn test_large_broadcast_is_batched() {
        let env = TestEnv::new();
        let recipients: Vec<String> = (0..1000).map(|i| format!("user{i}@discover.test")).collect();
        let outcome = NotificationService::new(&env.ctx)
            .broadcast(
                &env.admin,
                BroadcastRequest {
                    message: "hello all".into(),
                    link: None,
                    recipients: Some(recipients),
                },
            )
            .await
            .unwrap();

        assert_eq!(outcome.sent.recipient_count, 1000);
        assert_eq!(outcome.batches, 3);
        let inbox = NotificationService::new(&env.ctx)
            .list_for_user(&key("user999@discover.test"), None)
            .await
            .unwrap();
        assert_eq!(inbox.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_and_invalid_recipients() {
        let env = TestEnv::new();
        let svc = NotificationService::new(&env.ctx);

        let outcome = svc
            .broadcast(
                &env.admin,
                request("hi", Some(vec!["Bob@Discover.test", "bob@discover.test"])),
            )
            .await
            .unwrap();
        assert_eq!(outcome.sent.recipient_count, 1);

        let err = svc
            .broadcast(&env.admin, request("hi", Some(vec!["not-an-email"])))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}
