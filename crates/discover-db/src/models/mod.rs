//! Database models - one struct per table row

mod block;
mod collab_post;
mod comment;
mod notification;
mod profile;

pub use block::BlockModel;
pub(crate) use block::BLOCK_COLUMNS;
pub use collab_post::CollabPostModel;
pub use comment::CommentModel;
pub use notification::{NotificationModel, SentNotificationModel};
pub use profile::ProfileModel;
