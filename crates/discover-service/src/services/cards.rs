//! Card renderer
//!
//! Turns one feed item into a [`CardView`] for the current viewer and renders
//! it as an HTML fragment. The client script wires the interactions from the
//! `data-*` attributes: `data-href` click-through, `data-vote` buttons,
//! `data-submit="enter"` on the comment composer and `data-scroll-reset` on
//! carousels.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use discover_core::{BlockKind, Comment, Snowflake, VoteTally, VoteValue};
use futures::future::join_all;
use tracing::warn;

use super::comments::{CommentPage, CommentService};
use super::context::ServiceContext;
use super::feed::FeedItem;
use super::html::{escape, safe_url};
use super::session::{AuthorView, ViewerSession};
use super::votes::VoteService;

#[derive(Debug, Clone, PartialEq)]
pub struct CommentView {
    pub id: Snowflake,
    pub author: AuthorView,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub edited: bool,
    /// Viewer may edit or delete it
    pub can_manage: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub block_id: Snowflake,
    pub kind: BlockKind,
    pub title: String,
    pub description: String,
    pub link: Option<String>,
    pub thumbnail: Option<String>,
    pub image: Option<String>,
    pub slides: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub author: AuthorView,
    pub tally: VoteTally,
    pub score: i64,
    pub viewer_vote: VoteValue,
    pub comments: Vec<CommentView>,
    pub can_view_all_comments: bool,
    pub signed_in: bool,
    /// Viewer owns the block or is the admin
    pub can_manage: bool,
    pub comment_count: Option<u64>,
    pub relevance: Option<f64>,
}

impl CardView {
    pub fn vote_active(&self, direction: VoteValue) -> bool {
        !direction.is_neutral() && self.viewer_vote == direction
    }
}

pub struct CardService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CardService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Build cards for a page, preserving order
    pub async fn build_cards(&self, session: &ViewerSession, items: &[FeedItem]) -> Vec<CardView> {
        join_all(items.iter().map(|item| self.build_card(session, item))).await
    }

    /// Assemble one card; read failures degrade to defaults
    pub async fn build_card(&self, session: &ViewerSession, item: &FeedItem) -> CardView {
        let block = &item.block;
        let viewer = session.viewer();

        let author = session.profiles().resolve(self.ctx, &block.owner).await;

        let viewer_vote = match VoteService::new(self.ctx)
            .viewer_vote(viewer.as_ref(), block.id)
            .await
        {
            Ok(vote) => vote,
            Err(e) => {
                warn!(block_id = %block.id, error = %e, "Vote read failed, showing neutral");
                VoteValue::Neutral
            }
        };

        let page = match CommentService::new(self.ctx).first_page(block.id).await {
            Ok(page) => page,
            Err(e) => {
                warn!(block_id = %block.id, error = %e, "Comment read failed, showing none");
                CommentPage {
                    block_id: block.id,
                    comments: Vec::new(),
                    show_all: false,
                    can_view_all: false,
                }
            }
        };
        let comments = self.comment_views(session, &page.comments).await;

        let can_manage = viewer
            .as_ref()
            .is_some_and(|v| block.is_owned_by(v) || self.ctx.is_admin(v));

        CardView {
            block_id: block.id,
            kind: block.kind,
            title: block.title.clone(),
            description: block.description.clone(),
            link: block.link.clone(),
            thumbnail: block.thumbnail().map(str::to_string),
            image: block.image.clone(),
            slides: block.slides.clone(),
            created_at: block.created_at,
            author,
            tally: block.tally(),
            score: block.score,
            viewer_vote,
            comments,
            can_view_all_comments: page.can_view_all,
            signed_in: viewer.is_some(),
            can_manage,
            comment_count: item.comment_count,
            relevance: item.relevance,
        }
    }

    /// Resolve comment authors through the session cache
    pub async fn comment_views(
        &self,
        session: &ViewerSession,
        comments: &[Comment],
    ) -> Vec<CommentView> {
        let viewer = session.viewer();
        let mut views = Vec::with_capacity(comments.len());
        for comment in comments {
            let author = session.profiles().resolve(self.ctx, &comment.author).await;
            let can_manage = viewer
                .as_ref()
                .is_some_and(|v| v == &comment.author || self.ctx.is_admin(v));
            views.push(CommentView {
                id: comment.id,
                author,
                text: comment.text.clone(),
                created_at: comment.created_at,
                edited: comment.is_edited(),
                can_manage,
            });
        }
        views
    }
}

/// Render a card as an `<article>` fragment
pub fn render_html(card: &CardView) -> String {
    let mut html = String::with_capacity(1024);
    let href = card.link.as_deref().and_then(safe_url);

    let _ = write!(
        html,
        r#"<article class="block-card block-card--{kind}" data-block-id="{id}""#,
        kind = card.kind.as_str(),
        id = card.block_id,
    );
    if let Some(href) = &href {
        let _ = write!(html, r#" data-href="{href}""#);
    }
    html.push('>');

    render_author(&mut html, &card.author, "block-card__author");

    let title = escape(&card.title);
    let description = escape(&card.description);
    match card.kind {
        BlockKind::Default => {
            html.push_str(r#"<div class="block-card__row">"#);
            if let Some(src) = card.thumbnail.as_deref().and_then(safe_url) {
                let _ = write!(html, r#"<img class="block-card__thumb" src="{src}" alt="">"#);
            }
            let _ = write!(
                html,
                r#"<div class="block-card__text"><h3>{title}</h3><p>{description}</p></div></div>"#
            );
        }
        BlockKind::LargeImage => {
            if let Some(src) = card
                .image
                .as_deref()
                .or(card.thumbnail.as_deref())
                .and_then(safe_url)
            {
                let _ = write!(html, r#"<img class="block-card__image" src="{src}" alt="">"#);
            }
            let _ = write!(html, "<h3>{title}</h3><p>{description}</p>");
        }
        BlockKind::Carousel => {
            html.push_str(r#"<div class="block-card__carousel" data-scroll-reset="start">"#);
            for src in card.slides.iter().filter_map(|s| safe_url(s)) {
                let _ = write!(html, r#"<img class="block-card__slide" src="{src}" alt="">"#);
            }
            let _ = write!(html, "</div><h3>{title}</h3><p>{description}</p>");
        }
    }

    render_votes(&mut html, card);
    render_comments(&mut html, card);

    html.push_str("</article>");
    html
}

fn render_author(html: &mut String, author: &AuthorView, class: &str) {
    let name = escape(&author.display_name);
    let avatar = safe_url(&author.avatar).unwrap_or_default();
    match author.profile_href.as_deref().and_then(safe_url) {
        Some(href) => {
            let _ = write!(
                html,
                r#"<a class="{class}" href="{href}"><img class="avatar" src="{avatar}" alt=""><span>{name}</span></a>"#
            );
        }
        None => {
            let _ = write!(
                html,
                r#"<span class="{class}"><img class="avatar" src="{avatar}" alt=""><span>{name}</span></span>"#
            );
        }
    }
}

fn render_votes(html: &mut String, card: &CardView) {
    let disabled = if card.signed_in { "" } else { " disabled" };
    html.push_str(r#"<div class="block-card__votes">"#);
    for (direction, class, label) in [(VoteValue::Up, "up", "&#9650;"), (VoteValue::Down, "down", "&#9660;")] {
        let active = card.vote_active(direction);
        let _ = write!(
            html,
            r#"<button class="vote vote--{class}{state}" data-vote="{value}" aria-pressed="{active}"{disabled}>{label}</button>"#,
            state = if active { " is-active" } else { "" },
            value = direction.as_i64(),
        );
        if direction == VoteValue::Up {
            let _ = write!(html, r#"<span class="vote__score">{}</span>"#, card.score);
        }
    }
    html.push_str("</div>");
}

fn render_comments(html: &mut String, card: &CardView) {
    html.push_str(r#"<ul class="block-card__comments">"#);
    for comment in &card.comments {
        let _ = write!(html, r#"<li data-comment-id="{}">"#, comment.id);
        render_author(html, &comment.author, "comment__author");
        let _ = write!(html, r#"<span class="comment__text">{}</span>"#, escape(&comment.text));
        if comment.edited {
            html.push_str(r#"<span class="comment__edited">(edited)</span>"#);
        }
        html.push_str("</li>");
    }
    html.push_str("</ul>");

    if card.can_view_all_comments {
        html.push_str(r#"<button class="comments__view-all" data-view-all>View all comments</button>"#);
    }
    if card.signed_in {
        let _ = write!(
            html,
            r#"<input class="comment-composer" type="text" data-block-id="{}" data-submit="enter" placeholder="Add a comment...">"#,
            card.block_id
        );
    }
}
