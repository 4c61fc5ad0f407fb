//! Notification entity <-> model mappers

use discover_core::{DomainError, Notification, SentNotification, Snowflake};

use crate::models::{NotificationModel, SentNotificationModel};

use super::stored_key;

impl TryFrom<NotificationModel> for Notification {
    type Error = DomainError;

    fn try_from(model: NotificationModel) -> Result<Self, Self::Error> {
        Ok(Notification {
            id: Snowflake::new(model.id),
            recipient: stored_key(&model.recipient_key)?,
            sender: stored_key(&model.sender_key)?,
            message: model.message,
            link: model.link,
            created_at: model.created_at,
            read: model.read,
        })
    }
}

impl TryFrom<SentNotificationModel> for SentNotification {
    type Error = DomainError;

    fn try_from(model: SentNotificationModel) -> Result<Self, Self::Error> {
        Ok(SentNotification {
            id: Snowflake::new(model.id),
            sender: stored_key(&model.sender_key)?,
            message: model.message,
            link: model.link,
            recipient_count: model.recipient_count,
            created_at: model.created_at,
        })
    }
}
