//! Entity <-> model mappers
//!
//! Rows store user keys and block types as plain text; converting back into
//! entities re-validates them, so the conversions are fallible.

mod block;
mod collab_post;
mod comment;
mod notification;
mod profile;

use discover_core::{DomainError, UserKey};

/// Parse a stored user key, reporting corrupt rows as database errors
pub(crate) fn stored_key(raw: &str) -> Result<UserKey, DomainError> {
    UserKey::parse(raw).map_err(|_| DomainError::DatabaseError(format!("corrupt user key: {raw}")))
}

pub(crate) fn stored_keys(raw: Vec<String>) -> Result<Vec<UserKey>, DomainError> {
    raw.iter().map(|k| stored_key(k)).collect()
}

pub(crate) fn key_strings(keys: &[UserKey]) -> Vec<String> {
    keys.iter().map(ToString::to_string).collect()
}
