//! Feed event distribution over Redis pub/sub.

mod channels;
mod publisher;

pub use channels::FeedChannel;
pub use publisher::RedisEventPublisher;
