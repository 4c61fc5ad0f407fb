//! Comment entity <-> model mapper

use discover_core::{Comment, DomainError, Snowflake};

use crate::models::CommentModel;

use super::stored_key;

impl TryFrom<CommentModel> for Comment {
    type Error = DomainError;

    fn try_from(model: CommentModel) -> Result<Self, Self::Error> {
        Ok(Comment {
            id: Snowflake::new(model.id),
            block_id: Snowflake::new(model.block_id),
            author: stored_key(&model.author_key)?,
            text: model.text,
            created_at: model.created_at,
            edited_at: model.edited_at,
        })
    }
}
