//! Feed events published after state changes

mod feed_event;

pub use feed_event::{
    BlockDeletedEvent, BlockVotedEvent, CommentAddedEvent, CommentDeletedEvent, FeedEvent,
    FEED_CHANNEL,
};
