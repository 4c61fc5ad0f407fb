//! In-memory repositories
//!
//! [`MemoryDatabase`] implements every repository trait over maps guarded by
//! one `parking_lot::Mutex`. The lock is never held across an `.await`, and
//! each trait method runs its whole read-modify-write inside one critical
//! section, which gives votes the same atomicity as the PostgreSQL
//! transaction. Selected with `DATABASE_URL=memory` and used by tests.

mod blocks;
mod collab_posts;
mod comments;
mod notifications;
mod profiles;
mod votes;

use std::collections::{BTreeMap, HashMap};

use parking_lot::Mutex;

use discover_core::{
    Block, CollabPost, Comment, Notification, SentNotification, Snowflake, UserKey, UserProfile,
    VoteValue,
};

#[derive(Default)]
struct MemoryState {
    blocks: HashMap<Snowflake, Block>,
    votes: HashMap<(Snowflake, UserKey), VoteValue>,
    // ordered by comment id so equal timestamps still list deterministically
    comments: HashMap<Snowflake, BTreeMap<Snowflake, Comment>>,
    profiles: HashMap<UserKey, UserProfile>,
    next_numeric_id: i64,
    notifications: Vec<Notification>,
    sent: Vec<SentNotification>,
    collab_posts: HashMap<Snowflake, CollabPost>,
}

/// Process-local database
#[derive(Default)]
pub struct MemoryDatabase {
    state: Mutex<MemoryState>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

impl std::fmt::Debug for MemoryDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MemoryDatabase")
            .field("blocks", &state.blocks.len())
            .field("profiles", &state.profiles.len())
            .finish_non_exhaustive()
    }
}
