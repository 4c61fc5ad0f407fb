//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod blocks;
pub mod collab;
pub mod comments;
pub mod feed;
pub mod globe;
pub mod health;
pub mod navbar;
pub mod notifications;
pub mod profiles;
pub mod sessions;
pub mod uploads;
pub mod votes;
