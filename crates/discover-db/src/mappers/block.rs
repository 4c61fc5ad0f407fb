//! Block entity <-> model mapper

use discover_core::{Block, BlockKind, DomainError, Snowflake};

use crate::models::BlockModel;

use super::stored_key;

impl TryFrom<BlockModel> for Block {
    type Error = DomainError;

    fn try_from(model: BlockModel) -> Result<Self, Self::Error> {
        Ok(Block {
            id: Snowflake::new(model.id),
            owner: stored_key(&model.owner_key)?,
            title: model.title,
            description: model.description,
            link: model.link,
            kind: BlockKind::parse(&model.block_type).unwrap_or_default(),
            icon: model.icon,
            image: model.image,
            slides: model.slides,
            created_at: model.created_at,
            upvotes: model.upvotes,
            downvotes: model.downvotes,
            score: model.score,
        })
    }
}
