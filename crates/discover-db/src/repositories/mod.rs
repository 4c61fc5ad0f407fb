//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in discover-core.

mod block;
mod collab_post;
mod comment;
mod error;
mod notification;
mod profile;
mod vote;

pub use block::PgBlockRepository;
pub use collab_post::PgCollabPostRepository;
pub use comment::PgCommentRepository;
pub use notification::PgNotificationRepository;
pub use profile::PgProfileRepository;
pub use vote::PgVoteRepository;
