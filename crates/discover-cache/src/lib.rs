//! # discover-cache
//!
//! Redis connection pool and best-effort distribution of feed events.
//!
//! ```ignore
//! use discover_cache::{RedisEventPublisher, RedisPool, RedisPoolConfig};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let publisher = RedisEventPublisher::new(pool);
//! publisher.publish(&FeedEvent::BlockDeleted { block_id, timestamp }).await?;
//! ```

pub mod pool;
pub mod pubsub;

pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};
pub use pubsub::{FeedChannel, RedisEventPublisher};
