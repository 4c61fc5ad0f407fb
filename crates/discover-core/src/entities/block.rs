//! Block entity - one user-submitted feed item

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::{Snowflake, UserKey, VoteTally};

/// How a block card is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockKind {
    /// Thumbnail plus a text row
    #[default]
    Default,
    /// Full-width image
    LargeImage,
    /// Horizontally scrollable slides
    Carousel,
}

impl BlockKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::LargeImage => "large-image",
            Self::Carousel => "carousel",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        match raw {
            "" | "default" => Ok(Self::Default),
            "large-image" => Ok(Self::LargeImage),
            "carousel" => Ok(Self::Carousel),
            other => Err(DomainError::ValidationError(format!(
                "unknown block type: {other}"
            ))),
        }
    }
}

/// Block entity
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: Snowflake,
    pub owner: UserKey,
    pub title: String,
    pub description: String,
    pub link: Option<String>,
    pub kind: BlockKind,
    pub icon: Option<String>,
    pub image: Option<String>,
    pub slides: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub upvotes: i64,
    pub downvotes: i64,
    pub score: i64,
}

impl Block {
    pub fn new(id: Snowflake, owner: UserKey, title: String, description: String) -> Self {
        Self {
            id,
            owner,
            title,
            description,
            link: None,
            kind: BlockKind::Default,
            icon: None,
            image: None,
            slides: Vec::new(),
            created_at: Utc::now(),
            upvotes: 0,
            downvotes: 0,
            score: 0,
        }
    }

    #[inline]
    pub fn tally(&self) -> VoteTally {
        VoteTally::new(self.upvotes, self.downvotes)
    }

    /// Write counters back, keeping `score == upvotes - downvotes`
    pub fn set_tally(&mut self, tally: VoteTally) {
        self.upvotes = tally.upvotes;
        self.downvotes = tally.downvotes;
        self.score = tally.score();
    }

    #[inline]
    pub fn is_owned_by(&self, key: &UserKey) -> bool {
        &self.owner == key
    }

    /// Hours elapsed since creation, never negative
    pub fn hours_since_creation(&self, now: DateTime<Utc>) -> f64 {
        let millis = (now - self.created_at).num_milliseconds().max(0);
        millis as f64 / 3_600_000.0
    }

    /// Image used for the card thumbnail: explicit image, then icon, then first slide
    pub fn thumbnail(&self) -> Option<&str> {
        self.image
            .as_deref()
            .or(self.icon.as_deref())
            .or_else(|| self.slides.first().map(String::as_str))
    }

    /// Every stored media reference held by this block
    pub fn media_refs(&self) -> impl Iterator<Item = &str> {
        self.icon
            .iter()
            .chain(self.image.iter())
            .chain(self.slides.iter())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn block() -> Block {
        Block::new(
            Snowflake::new(1),
            UserKey::parse("owner@site.io").unwrap(),
            "Title".into(),
            "Body".into(),
        )
    }

    #[test]
    fn test_kind_round_trip_names() {
        for kind in [BlockKind::Default, BlockKind::LargeImage, BlockKind::Carousel] {
            assert_eq!(BlockKind::parse(kind.as_str()).unwrap(), kind);
        }
        assert!(BlockKind::parse("video").is_err());
    }

    #[test]
    fn test_set_tally_keeps_score() {
        let mut b = block();
        b.set_tally(VoteTally::new(5, 7));
        assert_eq!(b.score, -2);
        assert_eq!(b.tally(), VoteTally::new(5, 7));
    }

    #[test]
    fn test_hours_since_creation_clamps_future() {
        let mut b = block();
        let now = Utc::now();
        b.created_at = now - Duration::hours(10);
        assert!((b.hours_since_creation(now) - 10.0).abs() < 1e-9);
        b.created_at = now + Duration::hours(1);
        assert!(b.hours_since_creation(now).abs() < f64::EPSILON);
    }

    #[test]
    fn test_thumbnail_preference() {
        let mut b = block();
        assert!(b.thumbnail().is_none());
        b.slides = vec!["s1".into()];
        assert_eq!(b.thumbnail(), Some("s1"));
        b.icon = Some("icon".into());
        assert_eq!(b.thumbnail(), Some("icon"));
        b.image = Some("img".into());
        assert_eq!(b.thumbnail(), Some("img"));
        assert_eq!(b.media_refs().count(), 3);
    }
}
