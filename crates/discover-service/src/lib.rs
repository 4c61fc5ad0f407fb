//! # discover-service
//!
//! Application layer: feed paging and ranking, the vote ledger, comment
//! threads, card rendering, viewer sessions and the admin wrappers.

pub mod dto;
pub mod services;

pub use services::{
    BlockService, CardService, CollabPostService, CommentService, FeedPager, FeedService,
    NavbarService, NotificationService, ProfileService, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult, SessionRegistry, StorageService, ViewerSession, VoteService,
};
