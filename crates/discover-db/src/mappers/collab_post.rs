//! Collab post entity <-> model mapper

use discover_core::{CollabPost, DomainError, Snowflake};

use crate::models::CollabPostModel;

use super::stored_key;

impl TryFrom<CollabPostModel> for CollabPost {
    type Error = DomainError;

    fn try_from(model: CollabPostModel) -> Result<Self, Self::Error> {
        Ok(CollabPost {
            id: Snowflake::new(model.id),
            owner: stored_key(&model.owner_key)?,
            title: model.title,
            description: model.description,
            link: model.link,
            created_at: model.created_at,
        })
    }
}
