//! Entity to DTO conversions

use discover_core::{
    Block, CollabPost, Comment, FeedCursor, Notification, RankScope, SentNotification,
    UserProfile, VoteOutcome,
};

use crate::services::comments::CommentPage;
use crate::services::feed::{FeedItem, FeedPage};
use crate::services::notifications::BroadcastOutcome;
use crate::services::pager::{LoadOutcome, PagerSnapshot};
use crate::services::session::profile_href;

use super::responses::{
    BlockResponse, BroadcastResponse, CollabPostResponse, CommentPageResponse, CommentResponse,
    FeedItemResponse, NotificationResponse, PagerResponse, PaginationMeta, ProfileResponse,
    SentNotificationResponse, VoteResponse,
};

impl From<&Block> for BlockResponse {
    fn from(block: &Block) -> Self {
        Self {
            id: block.id,
            owner: block.owner.to_string(),
            title: block.title.clone(),
            description: block.description.clone(),
            link: block.link.clone(),
            block_type: block.kind.as_str(),
            icon: block.icon.clone(),
            image: block.image.clone(),
            slides: block.slides.clone(),
            created_at: block.created_at,
            upvotes: block.upvotes,
            downvotes: block.downvotes,
            score: block.score,
        }
    }
}

impl From<&FeedItem> for FeedItemResponse {
    fn from(item: &FeedItem) -> Self {
        Self {
            block: BlockResponse::from(&item.block),
            comment_count: item.comment_count,
            relevance: item.relevance,
        }
    }
}

impl PaginationMeta {
    pub fn from_page(page: &FeedPage, limit: usize) -> Self {
        Self {
            next_cursor: page
                .next_cursor
                .as_ref()
                .filter(|_| page.has_more)
                .map(FeedCursor::encode),
            has_more: page.has_more,
            limit,
        }
    }
}

pub fn rank_scope_name(scope: Option<RankScope>) -> Option<&'static str> {
    scope.map(|RankScope::Page| "page")
}

pub fn load_outcome_name(outcome: LoadOutcome) -> &'static str {
    match outcome {
        LoadOutcome::Loaded { .. } => "loaded",
        LoadOutcome::Skipped => "skipped",
        LoadOutcome::Discarded => "discarded",
        LoadOutcome::NotNeeded => "not_needed",
        LoadOutcome::Exhausted => "exhausted",
    }
}

impl PagerResponse {
    pub fn from_snapshot(
        session_id: String,
        snapshot: &PagerSnapshot,
        outcome: Option<LoadOutcome>,
    ) -> Self {
        Self {
            session_id,
            outcome: outcome.map(load_outcome_name),
            sort: snapshot.sort.as_str(),
            time: snapshot.time.as_str(),
            items: snapshot.items.iter().map(FeedItemResponse::from).collect(),
            next_cursor: snapshot.cursor.as_ref().map(FeedCursor::encode),
            has_more: snapshot.has_more,
            loading: snapshot.loading,
        }
    }
}

impl From<&VoteOutcome> for VoteResponse {
    fn from(outcome: &VoteOutcome) -> Self {
        Self {
            block_id: outcome.block_id,
            previous: outcome.previous.as_i64(),
            value: outcome.current.as_i64(),
            upvotes: outcome.tally.upvotes,
            downvotes: outcome.tally.downvotes,
            score: outcome.score(),
        }
    }
}

impl From<&Comment> for CommentResponse {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id,
            block_id: comment.block_id,
            author: comment.author.to_string(),
            text: comment.text.clone(),
            created_at: comment.created_at,
            edited_at: comment.edited_at,
        }
    }
}

impl From<&CommentPage> for CommentPageResponse {
    fn from(page: &CommentPage) -> Self {
        Self {
            data: page.comments.iter().map(CommentResponse::from).collect(),
            show_all: page.show_all,
            can_view_all: page.can_view_all,
        }
    }
}

impl From<&UserProfile> for ProfileResponse {
    fn from(profile: &UserProfile) -> Self {
        Self {
            user_key: profile.key.to_string(),
            title: profile.display_name().to_string(),
            avatar: profile.avatar_url().to_string(),
            numeric_id: profile.numeric_id,
            profile_href: profile_href(profile.numeric_id),
            connections: profile.connections.iter().map(ToString::to_string).collect(),
            dismissed_requests: profile
                .dismissed_requests
                .iter()
                .map(ToString::to_string)
                .collect(),
            created_at: profile.created_at,
        }
    }
}

impl From<&CollabPost> for CollabPostResponse {
    fn from(post: &CollabPost) -> Self {
        Self {
            id: post.id,
            owner: post.owner.to_string(),
            title: post.title.clone(),
            description: post.description.clone(),
            link: post.link.clone(),
            created_at: post.created_at,
        }
    }
}

impl From<&Notification> for NotificationResponse {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id,
            sender: n.sender.to_string(),
            message: n.message.clone(),
            link: n.link.clone(),
            created_at: n.created_at,
            read: n.read,
        }
    }
}

impl From<&SentNotification> for SentNotificationResponse {
    fn from(n: &SentNotification) -> Self {
        Self {
            id: n.id,
            sender: n.sender.to_string(),
            message: n.message.clone(),
            link: n.link.clone(),
            recipient_count: n.recipient_count,
            created_at: n.created_at,
        }
    }
}

impl From<&BroadcastOutcome> for BroadcastResponse {
    fn from(outcome: &BroadcastOutcome) -> Self {
        Self {
            sent: SentNotificationResponse::from(&outcome.sent),
            batches: outcome.batches,
        }
    }
}
