//! Viewer sessions and the per-session profile cache
//!
//! A [`ViewerSession`] holds the identity and the author profiles resolved
//! while rendering cards for that viewer. Profiles are fetched on a miss and
//! then kept for the life of the session; a read error is never cached.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use dashmap::DashMap;
use discover_core::{UserKey, UserProfile, DEFAULT_AVATAR};
use parking_lot::RwLock;
use uuid::Uuid;

use super::context::ServiceContext;
use super::feed::FeedSource;
use super::pager::FeedPager;

/// Author details as shown on a card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorView {
    pub key: UserKey,
    pub display_name: String,
    pub avatar: String,
    /// Only set when the profile was found
    pub profile_href: Option<String>,
}

impl AuthorView {
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            key: profile.key.clone(),
            display_name: profile.display_name().to_string(),
            avatar: profile.avatar_url().to_string(),
            profile_href: Some(profile_href(profile.numeric_id)),
        }
    }

    /// Raw identifier and default avatar
    pub fn fallback(key: &UserKey) -> Self {
        Self {
            key: key.clone(),
            display_name: key.as_str().to_string(),
            avatar: DEFAULT_AVATAR.to_string(),
            profile_href: None,
        }
    }
}

pub fn profile_href(numeric_id: i64) -> String {
    format!("index.html?profile={numeric_id}")
}

/// Profiles resolved during one session; `None` records a missing profile
#[derive(Debug, Default)]
pub struct ProfileCache {
    entries: DashMap<UserKey, Option<UserProfile>>,
}

impl ProfileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `key`, fetching on a miss
    pub async fn lookup(&self, ctx: &ServiceContext, key: &UserKey) -> Option<UserProfile> {
        if let Some(entry) = self.entries.get(key) {
            return entry.value().clone();
        }

        match ctx.profile_repo().find_by_key(key).await {
            Ok(found) => {
                // Concurrent misses may both fetch; the last write wins
                self.entries.insert(key.clone(), found.clone());
                found
            }
            Err(e) => {
                tracing::warn!(user = %key, error = %e, "Profile read failed, using fallback");
                None
            }
        }
    }

    pub async fn resolve(&self, ctx: &ServiceContext, key: &UserKey) -> AuthorView {
        match self.lookup(ctx, key).await {
            Some(profile) => AuthorView::from_profile(&profile),
            None => AuthorView::fallback(key),
        }
    }

    /// Replace the cached entry after the viewer edits their own profile
    pub fn store(&self, profile: UserProfile) {
        self.entries.insert(profile.key.clone(), Some(profile));
    }

    pub fn invalidate(&self, key: &UserKey) {
        self.entries.remove(key);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Identity plus profile cache for one visitor
#[derive(Debug, Default)]
pub struct ViewerSession {
    identity: RwLock<Option<UserKey>>,
    profiles: ProfileCache,
}

impl ViewerSession {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(key: UserKey) -> Self {
        Self {
            identity: RwLock::new(Some(key)),
            profiles: ProfileCache::new(),
        }
    }

    pub fn viewer(&self) -> Option<UserKey> {
        self.identity.read().clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.identity.read().is_some()
    }

    /// Switch identity; a different account starts with an empty cache
    pub fn sign_in(&self, key: UserKey) {
        let mut identity = self.identity.write();
        if identity.as_ref() != Some(&key) {
            self.profiles.clear();
            *identity = Some(key);
        }
    }

    pub fn sign_out(&self) {
        *self.identity.write() = None;
        self.profiles.clear();
    }

    pub fn profiles(&self) -> &ProfileCache {
        &self.profiles
    }
}

/// A viewer session with its feed pager
pub struct FeedSession {
    pub id: Uuid,
    pub viewer: ViewerSession,
    pub pager: FeedPager<FeedSource>,
    created_at: DateTime<Utc>,
    last_seen_ms: AtomicI64,
}

impl FeedSession {
    fn new(ctx: &ServiceContext, viewer: ViewerSession) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            viewer,
            pager: FeedPager::new(FeedSource::new(ctx.clone())),
            created_at: now,
            last_seen_ms: AtomicI64::new(now.timestamp_millis()),
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_seen(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.last_seen_ms.load(Ordering::Relaxed))
            .single()
            .unwrap_or(self.created_at)
    }

    fn touch(&self) {
        self.last_seen_ms
            .store(Utc::now().timestamp_millis(), Ordering::Relaxed);
    }
}

impl std::fmt::Debug for FeedSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedSession")
            .field("id", &self.id)
            .field("viewer", &self.viewer.viewer())
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Open feed sessions by id
pub struct SessionRegistry {
    ctx: ServiceContext,
    sessions: DashMap<Uuid, Arc<FeedSession>>,
}

impl SessionRegistry {
    pub fn new(ctx: ServiceContext) -> Self {
        Self {
            ctx,
            sessions: DashMap::new(),
        }
    }

    pub fn open(&self, viewer: Option<UserKey>) -> Arc<FeedSession> {
        let viewer = viewer.map_or_else(ViewerSession::anonymous, ViewerSession::signed_in);
        let session = Arc::new(FeedSession::new(&self.ctx, viewer));
        self.sessions.insert(session.id, session.clone());
        tracing::debug!(session_id = %session.id, "Feed session opened");
        session
    }

    pub fn get(&self, id: Uuid) -> Option<Arc<FeedSession>> {
        let session = self.sessions.get(&id).map(|s| s.value().clone())?;
        session.touch();
        Some(session)
    }

    pub fn close(&self, id: Uuid) -> bool {
        self.sessions.remove(&id).is_some()
    }

    /// Drop sessions not used for `max_idle`; returns how many were removed
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let cutoff = Utc::now() - max_idle;
        let before = self.sessions.len();
        self.sessions.retain(|_, s| s.last_seen() >= cutoff);
        let removed = before.saturating_sub(self.sessions.len());
        if removed > 0 {
            tracing::info!(removed, "Evicted idle feed sessions");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
