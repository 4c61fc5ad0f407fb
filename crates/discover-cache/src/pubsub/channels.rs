//! Pub/Sub channel naming.
//!
//! Every feed event goes to the shared feed channel; clients watching a single
//! card can subscribe to that block's channel instead.

use discover_core::{Snowflake, FEED_CHANNEL};

/// Redis channels carrying feed events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedChannel {
    /// All feed events
    Feed,
    /// Events for one block
    Block(Snowflake),
}

impl FeedChannel {
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Feed => FEED_CHANNEL.to_string(),
            Self::Block(id) => format!("{FEED_CHANNEL}:block:{id}"),
        }
    }

    /// Parse a channel name back into a `FeedChannel`
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        if name == FEED_CHANNEL {
            return Some(Self::Feed);
        }
        let id = name.strip_prefix(FEED_CHANNEL)?.strip_prefix(":block:")?;
        Snowflake::parse(id).ok().map(Self::Block)
    }

    /// Channels an event for `block_id` is delivered to
    #[must_use]
    pub fn targets(block_id: Snowflake) -> [Self; 2] {
        [Self::Feed, Self::Block(block_id)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_names() {
        assert_eq!(FeedChannel::Feed.name(), "discover:feed");
        assert_eq!(
            FeedChannel::Block(Snowflake::new(42)).name(),
            "discover:feed:block:42"
        );
    }

    #[test]
    fn test_channel_parse() {
        assert_eq!(FeedChannel::parse("discover:feed"), Some(FeedChannel::Feed));
        assert_eq!(
            FeedChannel::parse("discover:feed:block:7"),
            Some(FeedChannel::Block(Snowflake::new(7)))
        );
        assert_eq!(FeedChannel::parse("discover:feed:block:x"), None);
        assert_eq!(FeedChannel::parse("profile:1"), None);
    }
}
