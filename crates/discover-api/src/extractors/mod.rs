//! Custom extractors for Axum handlers

mod auth;
mod path;
mod validated;

pub use auth::{AuthUser, OptionalAuthUser};
pub use path::{BlockCommentPath, BlockIdPath, IdPath, SessionPath, UserKeyPath};
pub use validated::{JsonBody, OptionalJsonBody, ValidatedJson};
