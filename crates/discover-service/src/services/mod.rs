//! Application services
//!
//! Each service borrows the shared [`ServiceContext`] for the length of one
//! operation. Sessions and pagers are the only long-lived state.

mod access;
pub mod blocks;
pub mod cards;
pub mod collab;
pub mod comments;
pub mod context;
pub mod error;
pub mod feed;
pub mod html;
pub mod navbar;
pub mod notifications;
pub mod pager;
pub mod profiles;
pub mod session;
pub mod storage;
pub mod votes;

#[cfg(test)]
mod testing;

pub use blocks::BlockService;
pub use cards::{CardService, CardView, CommentView};
pub use collab::CollabPostService;
pub use comments::{CommentPage, CommentService, DEFAULT_COMMENT_LIMIT, VIEW_ALL_COMMENT_LIMIT};
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use feed::{FeedItem, FeedPage, FeedService, FeedSource};
pub use navbar::{NavbarService, NavbarSlot, NavbarSlots, NavbarView};
pub use notifications::{BroadcastOutcome, NotificationService};
pub use pager::{FeedPager, LoadOutcome, PageSource, PagerSnapshot, ScrollMetrics};
pub use profiles::ProfileService;
pub use session::{AuthorView, FeedSession, ProfileCache, SessionRegistry, ViewerSession};
pub use storage::{StorageService, UploadedImage};
pub use votes::VoteService;
