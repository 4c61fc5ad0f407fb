//! Navbar state derived from the viewer session
//!
//! The page carries two navbar slots (desktop and mobile) showing the same
//! identity.

use std::fmt::Write;

use discover_core::DEFAULT_AVATAR;
use serde::Serialize;

use super::context::ServiceContext;
use super::html::{escape, safe_url};
use super::session::ViewerSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NavbarSlot {
    Desktop,
    Mobile,
}

impl NavbarSlot {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Mobile => "mobile",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavbarView {
    pub slot: NavbarSlot,
    pub signed_in: bool,
    pub title: String,
    pub avatar: String,
    pub profile_href: Option<String>,
    pub is_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavbarSlots {
    pub desktop: NavbarView,
    pub mobile: NavbarView,
}

pub struct NavbarService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> NavbarService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn navbar(&self, session: &ViewerSession) -> NavbarSlots {
        let base = match session.viewer() {
            Some(key) => {
                let author = session.profiles().resolve(self.ctx, &key).await;
                NavbarView {
                    slot: NavbarSlot::Desktop,
                    signed_in: true,
                    title: author.display_name,
                    avatar: author.avatar,
                    profile_href: author.profile_href,
                    is_admin: self.ctx.is_admin(&key),
                }
            }
            None => NavbarView {
                slot: NavbarSlot::Desktop,
                signed_in: false,
                title: "Sign in".to_string(),
                avatar: DEFAULT_AVATAR.to_string(),
                profile_href: None,
                is_admin: false,
            },
        };

        NavbarSlots {
            mobile: NavbarView {
                slot: NavbarSlot::Mobile,
                ..base.clone()
            },
            desktop: base,
        }
    }
}

/// Render both slots as `<nav>` fragments
pub fn render_html(slots: &NavbarSlots) -> String {
    let mut html = String::new();
    for view in [&slots.desktop, &slots.mobile] {
        let _ = write!(
            html,
            r#"<nav class="navbar navbar--{slot}" data-signed-in="{signed_in}">"#,
            slot = view.slot.as_str(),
            signed_in = view.signed_in,
        );
        let avatar = safe_url(&view.avatar).unwrap_or_default();
        let title = escape(&view.title);
        match view.profile_href.as_deref().and_then(safe_url) {
            Some(href) => {
                let _ = write!(
                    html,
                    r#"<a class="navbar__profile" href="{href}"><img class="avatar" src="{avatar}" alt=""><span>{title}</span></a>"#
                );
            }
            None => {
                let _ = write!(
                    html,
                    r#"<span class="navbar__profile"><img class="avatar" src="{avatar}" alt=""><span>{title}</span></span>"#
                );
            }
        }
        if view.is_admin {
            html.push_str(r#"<a class="navbar__admin" href="admin.html">Admin</a>"#);
        }
        html.push_str("</nav>");
    }
    html
}
