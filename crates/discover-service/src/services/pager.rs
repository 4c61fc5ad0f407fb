//! Pagination cursor manager
//!
//! Keeps the cursor (last block of the last fetched page) and the rendered
//! list for one viewer. A single in-flight flag gates loads: a call made
//! while a fetch is running returns [`LoadOutcome::Skipped`] without queueing
//! or retrying.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use discover_core::{FeedCursor, SortMode, TimeFilter};
use parking_lot::Mutex;
use serde::Deserialize;

use super::error::ServiceResult;
use super::feed::{FeedItem, FeedPage};

/// Distance from the end of the scroll container that triggers the next page
pub const SCROLL_THRESHOLD_PX: f64 = 50.0;

/// Where pages come from
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(
        &self,
        sort: SortMode,
        time: TimeFilter,
        cursor: Option<FeedCursor>,
    ) -> ServiceResult<FeedPage>;
}

/// Scroll position reported by the client
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub client_height: f64,
    pub scroll_height: f64,
}

impl ScrollMetrics {
    pub fn near_end(&self) -> bool {
        self.scroll_top + self.client_height >= self.scroll_height - SCROLL_THRESHOLD_PX
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was fetched and appended
    Loaded { appended: usize, has_more: bool },
    /// Another fetch was in flight; nothing happened
    Skipped,
    /// The filters changed while this fetch ran; its rows were dropped
    Discarded,
    /// Scroll position is not near the end
    NotNeeded,
    /// The last page was shorter than a full page
    Exhausted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PagerSnapshot {
    pub sort: SortMode,
    pub time: TimeFilter,
    pub items: Vec<FeedItem>,
    pub cursor: Option<FeedCursor>,
    pub has_more: bool,
    pub loading: bool,
}

#[derive(Debug, Default)]
struct PagerState {
    sort: SortMode,
    time: TimeFilter,
    cursor: Option<FeedCursor>,
    items: Vec<FeedItem>,
    has_more: bool,
    // Set when a reset could not run because a fetch was in flight
    needs_reset: bool,
    generation: u64,
}

/// Clears the in-flight flag on every exit path
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct FeedPager<S> {
    source: S,
    loading: AtomicBool,
    state: Mutex<PagerState>,
}

impl<S: PageSource> FeedPager<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            loading: AtomicBool::new(false),
            state: Mutex::new(PagerState {
                has_more: true,
                ..PagerState::default()
            }),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> PagerSnapshot {
        let state = self.state.lock();
        PagerSnapshot {
            sort: state.sort,
            time: state.time,
            items: state.items.clone(),
            cursor: state.cursor,
            has_more: state.has_more,
            loading: self.is_loading(),
        }
    }

    /// Change sort/filter and reload from the first page
    pub async fn set_filters(&self, sort: SortMode, time: TimeFilter) -> ServiceResult<LoadOutcome> {
        {
            let mut state = self.state.lock();
            state.sort = sort;
            state.time = time;
            state.needs_reset = true;
            state.generation += 1;
        }
        self.load(true).await
    }

    /// Fetch the next page, or the first one when `reset` is set
    pub async fn load(&self, reset: bool) -> ServiceResult<LoadOutcome> {
        let Some(_guard) = self.begin() else {
            tracing::debug!("Feed load skipped, fetch already in flight");
            return Ok(LoadOutcome::Skipped);
        };

        let (sort, time, cursor, generation) = {
            let mut state = self.state.lock();
            if reset || state.needs_reset {
                state.cursor = None;
                state.items.clear();
                state.has_more = true;
                state.needs_reset = false;
            }
            (state.sort, state.time, state.cursor, state.generation)
        };

        let page = self.source.fetch(sort, time, cursor).await?;

        let mut state = self.state.lock();
        if state.generation != generation {
            return Ok(LoadOutcome::Discarded);
        }
        let appended = page.items.len();
        if page.next_cursor.is_some() {
            state.cursor = page.next_cursor;
        }
        state.items.extend(page.items);
        state.has_more = page.has_more;

        Ok(LoadOutcome::Loaded {
            appended,
            has_more: page.has_more,
        })
    }

    /// Load the next page when the viewer scrolled close to the end
    pub async fn on_scroll(&self, metrics: ScrollMetrics) -> ServiceResult<LoadOutcome> {
        if !metrics.near_end() {
            return Ok(LoadOutcome::NotNeeded);
        }
        if !self.state.lock().has_more {
            return Ok(LoadOutcome::Exhausted);
        }
        self.load(false).await
    }

    fn begin(&self) -> Option<InFlight<'_>> {
        self.loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(&self.loading))
    }
}
