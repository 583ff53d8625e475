//! Client-side view of "which bookmarks match the current query".
//!
//! [`BookmarkListStore`] owns the query state, the pagination cursor and the
//! materialized list, and applies server-confirmed mutations to it. Every
//! mutating method takes `&mut self`, so a host must funnel store access
//! through one execution context; renderers observe the result through
//! [`BookmarkListStore::subscribe`].
//!
//! Hosts that run network I/O elsewhere can split a load into
//! [`BookmarkListStore::begin_load`] / [`BookmarkListStore::complete_load`].
//! Completions may then arrive out of order; [`StaleResponsePolicy`] decides
//! whether responses for a superseded query are dropped or applied.

use std::sync::Arc;

use tokio::sync::watch;

use crate::config::{ClientConfig, StaleResponsePolicy};
use crate::models::{Bookmark, BookmarkPage, BookmarkUpdate, Collection, Tag};
use crate::presentation::NsfwDisplayMode;
use crate::query::{normalize_search, BookmarkFilter, BookmarkQuery, BookmarkSort, FilterScope};
use crate::service::BookmarkService;
use crate::Result;


/// Snapshot of everything a renderer needs to draw the bookmark list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkListState {
    pub bookmarks: Vec<Bookmark>,
    /// A resetting load is in flight
    pub is_loading: bool,
    /// A next-page load is in flight
    pub is_loading_more: bool,
    /// Last user-facing failure message
    pub error: Option<String>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total: u32,
    pub filter: BookmarkFilter,
    pub sort: BookmarkSort,
    /// Raw search box contents
    pub search_query: String,
    pub scope: Option<FilterScope>,
    pub collections: Vec<Collection>,
    pub tags: Vec<Tag>,
}

impl Default for BookmarkListState {
    fn default() -> Self {
        Self {
            bookmarks: Vec::new(),
            is_loading: false,
            is_loading_more: false,
            error: None,
            current_page: 1,
            total_pages: 1,
            total: 0,
            filter: BookmarkFilter::All,
            sort: BookmarkSort::Newest,
            search_query: String::new(),
            scope: None,
            collections: Vec::new(),
            tags: Vec::new(),
        }
    }
}

impl BookmarkListState {
    #[must_use]
    pub const fn has_more_pages(&self) -> bool {
        self.current_page < self.total_pages
    }

    #[must_use]
    pub fn filter_tag(&self) -> Option<&str> {
        match &self.scope {
            Some(FilterScope::Tag(tag)) => Some(tag),
            _ => None,
        }
    }

    #[must_use]
    pub fn filter_collection_id(&self) -> Option<&str> {
        match &self.scope {
            Some(FilterScope::Collection { id, .. }) => Some(id),
            _ => None,
        }
    }

    /// `#tag` or the collection name when a custom scope is active.
    #[must_use]
    pub fn active_filter_description(&self) -> Option<String> {
        match &self.scope {
            Some(FilterScope::Tag(tag)) => Some(format!("#{tag}")),
            Some(FilterScope::Collection { name, .. }) => Some(name.clone()),
            None => None,
        }
    }

    /// The query that fetches `current_page` under the current state.
    #[must_use]
    pub fn query(&self) -> BookmarkQuery {
        BookmarkQuery {
            filter: self.filter,
            sort: self.sort,
            search: normalize_search(&self.search_query),
            scope: self.scope.clone(),
            page: self.current_page,
        }
    }
}

/// An issued list request, handed back to [`BookmarkListStore::complete_load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    query: BookmarkQuery,
    reset: bool,
    epoch: u64,
    /// Page to fall back to if a next-page load fails
    restore_page: u32,
}

impl LoadTicket {
    #[must_use]
    pub const fn query(&self) -> &BookmarkQuery {
        &self.query
    }

    #[must_use]
    pub const fn is_reset(&self) -> bool {
        self.reset
    }
}

/// Bookmark list state container driving a [`BookmarkService`].
pub struct BookmarkListStore<S: ?Sized = dyn BookmarkService> {
    service: Arc<S>,
    state: BookmarkListState,
    policy: StaleResponsePolicy,
    /// Bumped by every resetting load; tickets from older epochs are stale
    epoch: u64,
    notifier: watch::Sender<BookmarkListState>,
}

impl<S: BookmarkService + ?Sized> BookmarkListStore<S> {
    pub fn new(service: Arc<S>, policy: StaleResponsePolicy) -> Self {
        let state = BookmarkListState::default();
        let (notifier, _) = watch::channel(state.clone());
        Self {
            service,
            state,
            policy,
            epoch: 0,
            notifier,
        }
    }

    pub fn from_config(service: Arc<S>, config: &ClientConfig) -> Self {
        Self::new(service, config.stale_responses)
    }

    /// Seed the query before the first load without fetching.
    ///
    /// A scope forces the flag filter back to `All`.
    #[must_use]
    pub fn with_query(
        mut self,
        filter: BookmarkFilter,
        scope: Option<FilterScope>,
        sort: BookmarkSort,
        search: impl Into<String>,
    ) -> Self {
        self.state.filter = if scope.is_some() {
            BookmarkFilter::All
        } else {
            filter
        };
        self.state.scope = scope;
        self.state.sort = sort;
        self.state.search_query = search.into();
        self.publish();
        self
    }

    #[must_use]
    pub const fn state(&self) -> &BookmarkListState {
        &self.state
    }

    #[must_use]
    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.state.bookmarks
    }

    #[must_use]
    pub const fn has_more_pages(&self) -> bool {
        self.state.has_more_pages()
    }

    #[must_use]
    pub fn active_filter_description(&self) -> Option<String> {
        self.state.active_filter_description()
    }

    #[must_use]
    pub const fn policy(&self) -> StaleResponsePolicy {
        self.policy
    }

    #[must_use]
    pub fn service(&self) -> Arc<S> {
        Arc::clone(&self.service)
    }

    /// Bookmarks a renderer should list under the given NSFW mode.
    #[must_use]
    pub fn visible_bookmarks(&self, mode: NsfwDisplayMode) -> Vec<&Bookmark> {
        self.state
            .bookmarks
            .iter()
            .filter(|bookmark| !mode.hides(bookmark))
            .collect()
    }

    /// Receive a fresh state snapshot after every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<BookmarkListState> {
        self.notifier.subscribe()
    }

    pub fn clear_error(&mut self) {
        if self.state.error.take().is_some() {
            self.publish();
        }
    }

    // -- Loading -----------------------------------------------------------

    /// Fetch `current_page` for the current query.
    ///
    /// With `reset` the cursor returns to page 1 and the list is replaced;
    /// otherwise the page is appended.
    pub async fn load(&mut self, reset: bool) {
        let Some(ticket) = self.begin_load(reset) else {
            return;
        };
        let result = self.service.fetch_bookmarks(ticket.query()).await;
        self.complete_load(ticket, result);
    }

    /// Advance the cursor and append the next page, if there is one.
    pub async fn load_next_page(&mut self) {
        let Some(ticket) = self.begin_next_page() else {
            return;
        };
        let result = self.service.fetch_bookmarks(ticket.query()).await;
        self.complete_load(ticket, result);
    }

    pub async fn refresh(&mut self) {
        self.load(true).await;
    }

    /// Mark a load as started and return the request to send.
    ///
    /// Returns `None` for a non-reset load while another one is in flight
    /// or when the cursor is already on the last page.
    pub fn begin_load(&mut self, reset: bool) -> Option<LoadTicket> {
        if !reset && self.state.is_loading_more {
            tracing::debug!("Ignoring load-more: one is already in flight");
            return None;
        }
        if !reset && !self.state.has_more_pages() {
            tracing::debug!(
                page = self.state.current_page,
                total_pages = self.state.total_pages,
                "Ignoring load-more: no pages left"
            );
            return None;
        }
        let restore_page = self.state.current_page;
        Some(self.start_load(reset, restore_page))
    }

    /// Advance the cursor and return the next-page request.
    ///
    /// Returns `None` when the cursor is on the last page or a next-page
    /// load is already in flight; the cursor is left untouched.
    pub fn begin_next_page(&mut self) -> Option<LoadTicket> {
        if !self.state.has_more_pages() || self.state.is_loading_more {
            return None;
        }
        let restore_page = self.state.current_page;
        self.state.current_page += 1;
        Some(self.start_load(false, restore_page))
    }

    /// Apply the outcome of a request issued by [`Self::begin_load`] or
    /// [`Self::begin_next_page`].
    ///
    /// Returns `false` when the response was discarded as stale.
    pub fn complete_load(&mut self, ticket: LoadTicket, result: Result<BookmarkPage>) -> bool {
        if self.policy == StaleResponsePolicy::DiscardStale && ticket.epoch != self.epoch {
            tracing::warn!(
                ticket_epoch = ticket.epoch,
                current_epoch = self.epoch,
                page = ticket.query.page,
                "Discarding stale bookmark response"
            );
            return false;
        }

        match result {
            Ok(page) => {
                tracing::debug!(
                    page = ticket.query.page,
                    received = page.bookmarks.len(),
                    total = page.total,
                    total_pages = page.total_pages,
                    "Bookmarks loaded"
                );
                if ticket.reset {
                    self.state.bookmarks = page.bookmarks;
                } else {
                    self.state.bookmarks.extend(page.bookmarks);
                }
                self.state.total_pages = page.total_pages;
                self.state.total = page.total;
                self.state.error = None;
            }
            Err(error) => {
                tracing::warn!(page = ticket.query.page, "Failed to load bookmarks: {}", error);
                self.state.error = Some(error.to_string());
                // A newer reset owns the cursor now.
                if !ticket.reset && ticket.epoch == self.epoch {
                    self.state.current_page = ticket.restore_page;
                }
            }
        }

        self.state.is_loading = false;
        self.state.is_loading_more = false;
        self.publish();
        true
    }

    fn start_load(&mut self, reset: bool, restore_page: u32) -> LoadTicket {
        if reset {
            self.epoch += 1;
            self.state.current_page = 1;
            self.state.is_loading = true;
            // Any in-flight next-page load belongs to the old query now.
            self.state.is_loading_more = false;
        } else {
            self.state.is_loading_more = true;
        }
        self.state.error = None;

        let ticket = LoadTicket {
            query: self.state.query(),
            reset,
            epoch: self.epoch,
            restore_page,
        };
        self.publish();
        ticket
    }

    // -- Mutations ---------------------------------------------------------

    pub async fn delete_bookmark(&mut self, id: &str) {
        match self.service.delete_bookmark(id).await {
            Ok(()) => {
                let before = self.state.bookmarks.len();
                self.state.bookmarks.retain(|bookmark| bookmark.id != id);
                self.state.total = self.state.total.saturating_sub(1);
                tracing::debug!(
                    id,
                    removed = before - self.state.bookmarks.len(),
                    "Bookmark deleted"
                );
                self.publish();
            }
            Err(error) => self.record_error("delete bookmark", &error),
        }
    }

    pub async fn toggle_archive(&mut self, bookmark: &Bookmark) {
        let update = BookmarkUpdate::archived(!bookmark.is_archived);
        self.apply_update(&bookmark.id, &update).await;
    }

    pub async fn toggle_read_later(&mut self, bookmark: &Bookmark) {
        let update = BookmarkUpdate::read_later(!bookmark.is_read_later);
        self.apply_update(&bookmark.id, &update).await;
    }

    async fn apply_update(&mut self, id: &str, update: &BookmarkUpdate) {
        match self.service.update_bookmark(id, update).await {
            Ok(updated) => self.replace_or_evict(updated),
            Err(error) => self.record_error("update bookmark", &error),
        }
    }

    /// Swap in the server's copy, or drop it if it left the active filter.
    fn replace_or_evict(&mut self, updated: Bookmark) {
        let Some(index) = self
            .state
            .bookmarks
            .iter()
            .position(|bookmark| bookmark.id == updated.id)
        else {
            return;
        };

        if self.state.filter.matches(&updated) {
            self.state.bookmarks[index] = updated;
        } else {
            tracing::debug!(id = %updated.id, filter = %self.state.filter, "Bookmark left active filter");
            self.state.bookmarks.remove(index);
            self.state.total = self.state.total.saturating_sub(1);
        }
        self.publish();
    }

    // -- Filters -----------------------------------------------------------

    pub async fn set_filter(&mut self, filter: BookmarkFilter) {
        self.state.filter = filter;
        self.state.scope = None;
        self.load(true).await;
    }

    pub async fn set_tag_filter(&mut self, tag: impl Into<String>) {
        self.state.scope = Some(FilterScope::Tag(tag.into()));
        self.state.filter = BookmarkFilter::All;
        self.load(true).await;
    }

    pub async fn set_collection_filter(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.state.scope = Some(FilterScope::Collection {
            id: id.into(),
            name: name.into(),
        });
        self.state.filter = BookmarkFilter::All;
        self.load(true).await;
    }

    pub async fn clear_custom_filter(&mut self) {
        self.state.scope = None;
        self.load(true).await;
    }

    pub async fn set_sort(&mut self, sort: BookmarkSort) {
        self.state.sort = sort;
        self.load(true).await;
    }

    pub async fn set_search_query(&mut self, query: impl Into<String>) {
        self.state.search_query = query.into();
        self.load(true).await;
    }

    // -- Collections & tags ------------------------------------------------

    pub async fn load_collections(&mut self) {
        match self.service.fetch_collections().await {
            Ok(collections) => {
                self.state.collections = collections;
                self.publish();
            }
            Err(error) => self.record_error("load collections", &error),
        }
    }

    pub async fn load_tags(&mut self) {
        match self.service.fetch_tags().await {
            Ok(tags) => {
                self.state.tags = tags;
                self.publish();
            }
            Err(error) => self.record_error("load tags", &error),
        }
    }

    fn record_error(&mut self, action: &str, error: &crate::Error) {
        tracing::warn!("Failed to {}: {}", action, error);
        self.state.error = Some(error.to_string());
        self.publish();
    }

    fn publish(&self) {
        self.notifier.send_replace(self.state.clone());
    }
}
