//! Redis Pub/Sub publisher for feed events.

use async_trait::async_trait;
use discover_core::{DomainError, EventPublisher, FeedEvent, RepoResult};
use redis::AsyncCommands;

use crate::pool::{RedisPool, RedisPoolError, RedisResult};
use crate::pubsub::FeedChannel;

/// Publishes [`FeedEvent`]s to the feed channel and the block's own channel
#[derive(Clone)]
pub struct RedisEventPublisher {
    pool: RedisPool,
}

impl RedisEventPublisher {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Publish one event, returning the total number of receivers
    pub async fn publish_event(&self, event: &FeedEvent) -> RedisResult<u32> {
        let payload = encode_event(event)?;
        let mut conn = self.pool.get().await?;
        let mut total_receivers = 0;

        for channel in FeedChannel::targets(event.block_id()) {
            let receivers: u32 = conn.publish(channel.name(), &payload).await?;
            total_receivers += receivers;
        }

        tracing::debug!(
            event_type = event.event_type(),
            block_id = %event.block_id(),
            receivers = total_receivers,
            "Published feed event"
        );

        Ok(total_receivers)
    }
}

#[async_trait]
impl EventPublisher for RedisEventPublisher {
    async fn publish(&self, event: &FeedEvent) -> RepoResult<()> {
        self.publish_event(event)
            .await
            .map(|_| ())
            .map_err(|e| DomainError::CacheError(e.to_string()))
    }
}

fn encode_event(event: &FeedEvent) -> Result<String, RedisPoolError> {
    Ok(serde_json::to_string(event)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use discover_core::events::{CommentAddedEvent, FeedEvent};
    use discover_core::{Snowflake, UserKey};

    #[test]
    fn test_payload_carries_type_tag() {
        let event = FeedEvent::CommentAdded(CommentAddedEvent {
            block_id: Snowflake::new(3),
            comment_id: Snowflake::new(4),
            author: UserKey::parse("a@b.io").unwrap(),
            timestamp: Utc::now(),
        });

        let payload = encode_event(&event).unwrap();
        let json: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(json["type"], "COMMENT_ADDED");
        assert_eq!(json["comment_id"], "4");
    }

    #[tokio::test]
    async fn test_publish_against_live_redis() {
        let Ok(url) = std::env::var("REDIS_URL") else {
            eprintln!("Skipping test: REDIS_URL not set");
            return;
        };
        let pool = RedisPool::new(crate::RedisPoolConfig {
            url,
            max_connections: 2,
        })
        .unwrap();
        if pool.health_check().await.is_err() {
            eprintln!("Skipping test: Redis unreachable");
            return;
        }

        let publisher = RedisEventPublisher::new(pool);
        let event = FeedEvent::BlockDeleted(discover_core::events::BlockDeletedEvent {
            block_id: Snowflake::new(11),
            timestamp: Utc::now(),
        });
        assert!(EventPublisher::publish(&publisher, &event).await.is_ok());
    }
}
