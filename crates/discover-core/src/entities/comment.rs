//! Comment entity - one entry in a block's comment thread

use chrono::{DateTime, Utc};

use crate::value_objects::{Snowflake, UserKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: Snowflake,
    pub block_id: Snowflake,
    pub author: UserKey,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
}

impl Comment {
    pub fn new(id: Snowflake, block_id: Snowflake, author: UserKey, text: String) -> Self {
        Self {
            id,
            block_id,
            author,
            text,
            created_at: Utc::now(),
            edited_at: None,
        }
    }

    pub fn edit(&mut self, text: String) {
        self.text = text;
        self.edited_at = Some(Utc::now());
    }

    #[inline]
    pub fn is_edited(&self) -> bool {
        self.edited_at.is_some()
    }
}

/// Trimmed comment text, or `None` when nothing is left to post
pub fn normalize_comment_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_marks_edited() {
        let mut c = Comment::new(
            Snowflake::new(2),
            Snowflake::new(1),
            UserKey::parse("a@b.io").unwrap(),
            "first".into(),
        );
        assert!(!c.is_edited());
        c.edit("second".into());
        assert!(c.is_edited());
        assert_eq!(c.text, "second");
    }

    #[test]
    fn test_normalize_comment_text() {
        assert_eq!(normalize_comment_text("  hi  ").as_deref(), Some("hi"));
        assert!(normalize_comment_text(" \n\t").is_none());
    }
}
