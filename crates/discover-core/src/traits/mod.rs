//! Ports - repository and infrastructure traits implemented outside the domain

mod ports;
mod repositories;

pub use ports::{BlobStore, EventPublisher, NoopPublisher};
pub use repositories::{
    BlockRepository, CollabPostRepository, CommentRepository, NotificationRepository,
    ProfileRepository, RepoResult, VoteRepository,
};
