//! Domain entities - core business objects

mod block;
mod collab_post;
mod comment;
mod notification;
mod profile;
mod vote;

pub use block::{Block, BlockKind};
pub use collab_post::CollabPost;
pub use comment::{normalize_comment_text, Comment};
pub use notification::{Notification, SentNotification, NOTIFICATION_BATCH_LIMIT};
pub use profile::{UserProfile, DEFAULT_AVATAR};
pub use vote::{Vote, VoteOutcome};
