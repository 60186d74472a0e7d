//! Page history for the active query.
//!
//! [`SearchSession`] owns every page fetched for the current query plus the
//! index being viewed. Going back never fetches. Going forward reuses a page
//! already seen, or fetches exactly one new page from the last page's
//! continuation form.
//!
//! # Concurrency
//!
//! Methods take `&self` so a front end can keep navigating while a fetch is
//! pending. State sits behind a mutex that is never held across an `.await`.
//!
//! - Each `search()` takes a new generation. Its first page only lands if no
//!   newer search started meanwhile; otherwise it is reported as
//!   [`Navigation::Superseded`].
//! - A history remembers the generation of the search that built it. A
//!   continuation page only lands if that history is still the current one,
//!   so a search that fails leaves a pending `next()` alone.
//! - At most one continuation fetch per history is in flight. A `next()` that
//!   would start a second one fails with [`SearchError::FetchInFlight`].
//! - A fetch future that is dropped before completing releases its latch on
//!   drop.
//!
//! ```text
//!            search                     next (cached)
//! ┌───────┐ ───────► ┌────────────────┐ ───────────► idx + 1
//! │ Empty │          │ Loaded(pages,  │ next (last, continuation) ──► fetch, append
//! └───────┘          │        idx)    │ next (last, none) ──► EndOfResults
//!                    └────────────────┘ previous ──► idx - 1 (floor 0)
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{Result, SearchError};
use crate::fetch::{load_page, PageRequest, PageSource};
use crate::recent::RecentQueries;
use crate::types::{Entry, Page, SearchFilters};

/// What a navigation call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Moved to a page already in the history. No fetch.
    Moved {
        /// New current index.
        index: usize,
    },
    /// Fetched a page and made it current.
    Loaded {
        /// New current index.
        index: usize,
    },
    /// At the last page and it has no continuation.
    EndOfResults,
    /// Already at the first page.
    Unchanged,
    /// The fetch finished after a newer search replaced the history; its
    /// page was discarded.
    Superseded,
}

/// Read-only view of the session for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Query the current pages belong to, if any search has completed.
    pub query: Option<String>,
    /// Filters used for that query.
    pub filters: SearchFilters,
    /// Generation of the most recent `search()` call.
    pub generation: u64,
    /// Index of the page being viewed.
    pub current_index: usize,
    /// Number of pages fetched for the query.
    pub page_count: usize,
    /// Entries of the page being viewed.
    pub entries: Vec<Entry>,
    /// Whether a fetch is pending.
    pub loading: bool,
    /// Whether `next()` could show another page.
    pub has_next: bool,
}

#[derive(Debug, Default)]
struct PaginationState {
    /// Generation of the search that produced these pages; 0 when empty.
    generation: u64,
    /// A continuation fetch for these pages is pending.
    fetching: bool,
    query: Option<String>,
    filters: SearchFilters,
    pages: Vec<Page>,
    current_index: usize,
}

impl PaginationState {
    fn current_page(&self) -> Option<&Page> {
        self.pages.get(self.current_index)
    }

    fn is_at_last(&self) -> bool {
        self.current_index + 1 >= self.pages.len()
    }

    fn has_next(&self) -> bool {
        if self.pages.is_empty() {
            return false;
        }
        !self.is_at_last() || self.pages[self.pages.len() - 1].has_continuation()
    }
}

#[derive(Debug, Default)]
struct SessionState {
    /// Generation of the most recent `search()` call.
    generation: u64,
    /// The search for `generation` is still pending.
    searching: bool,
    history: PaginationState,
    recent: RecentQueries,
}

impl SessionState {
    fn is_loading(&self) -> bool {
        self.searching || self.history.fetching
    }
}

/// Which flag a pending fetch holds.
#[derive(Debug, Clone, Copy)]
enum Latch {
    /// `searching`, for the search of this generation.
    Search(u64),
    /// `history.fetching`, for the history of this generation.
    Continuation(u64),
}

impl Latch {
    /// Release the flag if it still belongs to this fetch.
    fn release(self, state: &mut SessionState) {
        match self {
            Self::Search(generation) if state.generation == generation => {
                state.searching = false;
            }
            Self::Continuation(generation) if state.history.generation == generation => {
                state.history.fetching = false;
            }
            _ => {}
        }
    }
}

/// Releases a latch if the owning fetch is dropped mid-await.
struct FetchLatch<'a> {
    state: &'a Mutex<SessionState>,
    latch: Latch,
    armed: bool,
}

impl<'a> FetchLatch<'a> {
    fn new(state: &'a Mutex<SessionState>, latch: Latch) -> Self {
        Self {
            state,
            latch,
            armed: true,
        }
    }

    /// The caller holds the lock and settles the flag itself.
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for FetchLatch<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        self.latch.release(&mut state);
        tracing::debug!(latch = ?self.latch, "fetch cancelled");
    }
}

/// Search engine front: one query's page history plus the recent-query list.
pub struct SearchSession<S> {
    source: S,
    state: Mutex<SessionState>,
}

impl<S: PageSource> SearchSession<S> {
    /// Session with no history and no recent queries.
    pub fn new(source: S) -> Self {
        Self::with_recent_queries(source, RecentQueries::new())
    }

    /// Session seeded with previously stored recent queries.
    pub fn with_recent_queries(source: S, recent: RecentQueries) -> Self {
        Self {
            source,
            state: Mutex::new(SessionState {
                recent,
                ..Default::default()
            }),
        }
    }

    /// The transport pages are fetched through.
    pub fn source(&self) -> &S {
        &self.source
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start over with `query`: fetch its first page and make it the only
    /// page in the history.
    ///
    /// The query is recorded in the recent list before the fetch. If the
    /// fetch fails the previous history stays visible, along with any
    /// continuation fetch still pending for it.
    ///
    /// # Errors
    ///
    /// Transport errors, or [`SearchError::MalformedDocument`].
    pub async fn search(&self, query: &str, filters: SearchFilters) -> Result<Navigation> {
        let generation = {
            let mut state = self.lock();
            state.recent.record(query);
            state.generation += 1;
            state.searching = true;
            state.generation
        };
        tracing::trace!(query, generation, "search started");

        let latch = FetchLatch::new(&self.state, Latch::Search(generation));
        let request = PageRequest::First {
            query: query.to_owned(),
            filters: filters.clone(),
        };
        let result = load_page(&self.source, &request).await;

        let mut state = self.lock();
        latch.disarm();
        if state.generation != generation {
            tracing::warn!(
                generation,
                current = state.generation,
                "discarding superseded search result"
            );
            return Ok(Navigation::Superseded);
        }
        state.searching = false;

        let page = result.inspect_err(|err| {
            tracing::warn!(generation, error = %err, "search failed");
        })?;
        tracing::debug!(generation, entries = page.entries.len(), "first page loaded");

        state.history = PaginationState {
            generation,
            fetching: false,
            query: Some(query.to_owned()),
            filters,
            pages: vec![page],
            current_index: 0,
        };
        Ok(Navigation::Loaded { index: 0 })
    }

    /// Show the following page, fetching it only if it has not been seen.
    ///
    /// # Errors
    ///
    /// [`SearchError::NoActiveSearch`] before the first successful search,
    /// [`SearchError::FetchInFlight`] if a fetch is already pending, and
    /// transport or parse errors from the fetch. A failed fetch leaves the
    /// history untouched.
    pub async fn next(&self) -> Result<Navigation> {
        let (generation, descriptor) = {
            let mut guard = self.lock();
            let state = &mut *guard;
            let history = &mut state.history;

            if history.pages.is_empty() {
                return Err(SearchError::NoActiveSearch);
            }
            if !history.is_at_last() {
                history.current_index += 1;
                return Ok(Navigation::Moved {
                    index: history.current_index,
                });
            }

            let last = history.pages.len() - 1;
            let Some(descriptor) = history.pages[last].continuation.clone() else {
                return Ok(Navigation::EndOfResults);
            };
            if history.fetching {
                return Err(SearchError::FetchInFlight);
            }
            history.fetching = true;
            (history.generation, descriptor)
        };
        tracing::trace!(generation, "continuation fetch started");

        let latch = FetchLatch::new(&self.state, Latch::Continuation(generation));
        let result = load_page(&self.source, &PageRequest::Continuation(descriptor)).await;

        let mut state = self.lock();
        latch.disarm();
        if state.history.generation != generation {
            tracing::warn!(
                generation,
                current = state.history.generation,
                "discarding continuation page for replaced history"
            );
            return Ok(Navigation::Superseded);
        }
        state.history.fetching = false;

        let page = result.inspect_err(|err| {
            tracing::warn!(generation, error = %err, "continuation fetch failed");
        })?;

        let history = &mut state.history;
        history.pages.push(page);
        history.current_index = history.pages.len() - 1;
        tracing::debug!(
            generation,
            index = history.current_index,
            "continuation page loaded"
        );
        Ok(Navigation::Loaded {
            index: history.current_index,
        })
    }

    /// Show the preceding page. Never fetches.
    pub fn previous(&self) -> Navigation {
        let mut state = self.lock();
        let history = &mut state.history;
        if history.current_index == 0 {
            return Navigation::Unchanged;
        }
        history.current_index -= 1;
        Navigation::Moved {
            index: history.current_index,
        }
    }

    /// Entries of the page being viewed; empty before the first search.
    pub fn current_entries(&self) -> Vec<Entry> {
        self.lock()
            .history
            .current_page()
            .map(|page| page.entries.clone())
            .unwrap_or_default()
    }

    /// Index of the page being viewed.
    pub fn current_index(&self) -> usize {
        self.lock().history.current_index
    }

    /// Number of pages in the history.
    pub fn page_count(&self) -> usize {
        self.lock().history.pages.len()
    }

    /// Whether a fetch is pending.
    pub fn is_loading(&self) -> bool {
        self.lock().is_loading()
    }

    /// Whether `next()` could show another page: always when behind the last
    /// seen page, otherwise only if the last page has a continuation.
    pub fn has_next_page(&self) -> bool {
        self.lock().history.has_next()
    }

    /// Copy of the recent-query list.
    pub fn recent_queries(&self) -> RecentQueries {
        self.lock().recent.clone()
    }

    /// Forget all recent queries.
    pub fn clear_recent_queries(&self) {
        self.lock().recent.clear();
    }

    /// Everything a renderer needs, read under one lock.
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.lock();
        let history = &state.history;
        SessionSnapshot {
            query: history.query.clone(),
            filters: history.filters.clone(),
            generation: state.generation,
            current_index: history.current_index,
            page_count: history.pages.len(),
            entries: history
                .current_page()
                .map(|page| page.entries.clone())
                .unwrap_or_default(),
            loading: state.is_loading(),
            has_next: history.has_next(),
        }
    }
}
