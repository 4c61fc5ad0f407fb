//! Profile entity <-> model mapper

use discover_core::{DomainError, UserProfile};

use crate::models::ProfileModel;

use super::{stored_key, stored_keys};

impl TryFrom<ProfileModel> for UserProfile {
    type Error = DomainError;

    fn try_from(model: ProfileModel) -> Result<Self, Self::Error> {
        Ok(UserProfile {
            key: stored_key(&model.user_key)?,
            title: model.title,
            avatar: model.avatar,
            numeric_id: model.numeric_id,
            connections: stored_keys(model.connections)?,
            dismissed_requests: stored_keys(model.dismissed_requests)?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
