//! Browse/search state machine that drives catalog fetching.
//!
//! The [`Controller`] owns the query (mode, search text, page), the paging
//! bounds and the current [`RequestOutcome`]. Every action decides
//! synchronously whether a fetch is needed and, if so, hands back a
//! [`PageRequest`] ticket. The caller performs the fetch (inline via
//! [`Controller::resolve`] or on a spawned task) and reports back through
//! [`Controller::complete`].
//!
//! Tickets carry a generation number. Only the most recently issued ticket may
//! change state; completions for older tickets are dropped, so a slow response
//! can never overwrite a newer one.

use crate::catalog::{CatalogError, CatalogQuery, CatalogSource, MovieSummary, ResultPage};

/// Which request shape the controller is showing results for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browse,
    Search,
}

/// What the user asked for.
///
/// `mode == Search` implies `search_text` is non-empty after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub mode: Mode,
    pub search_text: String,
    pub page: u32,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            mode: Mode::Browse,
            search_text: String::new(),
            page: 1,
        }
    }
}

/// The UI-visible result of the latest request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome {
    Loading,
    Success(ResultPage),
    Failure(String),
}

/// Coarse state for rendering and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    IdleBrowse,
    IdleSearch,
    Loading,
    Error,
}

/// A fetch the caller must perform and then report via [`Controller::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub generation: u64,
    pub query: CatalogQuery,
    pub page: u32,
}

pub struct Controller {
    query: QueryState,
    outcome: RequestOutcome,
    /// Bounds for `change_page`. Kept across failures so navigation can retry.
    total_pages: u32,
    /// Generation of the most recently issued request.
    generation: u64,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller {
    /// Browse mode, page 1, loading. Call [`Controller::start`] to get the first request.
    pub fn new() -> Self {
        Self {
            query: QueryState::default(),
            outcome: RequestOutcome::Loading,
            total_pages: 0,
            generation: 0,
        }
    }

    // ------------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------------

    /// Initial mount: request page 1 of the popularity listing.
    pub fn start(&mut self) -> PageRequest {
        self.query = QueryState::default();
        self.issue()
    }

    /// Switch to search mode for `text`. Blank input is ignored.
    pub fn submit_search(&mut self, text: &str) -> Option<PageRequest> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            tracing::trace!("Ignoring blank search submission");
            return None;
        }

        self.query = QueryState {
            mode: Mode::Search,
            search_text: trimmed.to_string(),
            page: 1,
        };
        Some(self.issue())
    }

    /// Return to the popularity listing at page 1.
    pub fn clear_search(&mut self) -> PageRequest {
        self.query = QueryState::default();
        self.issue()
    }

    /// Re-issue the current mode's request for `new_page`.
    ///
    /// No-op unless `1 <= new_page <= total_pages`. Requesting the page already
    /// shown still fetches.
    pub fn change_page(&mut self, new_page: u32) -> Option<PageRequest> {
        if new_page < 1 || new_page > self.total_pages {
            tracing::trace!(
                new_page,
                total_pages = self.total_pages,
                "Page change out of range"
            );
            return None;
        }

        self.query.page = new_page;
        Some(self.issue())
    }

    pub fn next_page(&mut self) -> Option<PageRequest> {
        self.change_page(self.query.page.saturating_add(1))
    }

    pub fn prev_page(&mut self) -> Option<PageRequest> {
        self.change_page(self.query.page.saturating_sub(1))
    }

    pub fn first_page(&mut self) -> Option<PageRequest> {
        self.change_page(1)
    }

    pub fn last_page(&mut self) -> Option<PageRequest> {
        self.change_page(self.total_pages)
    }

    /// Re-issue the current request unchanged.
    ///
    /// Unlike `change_page` this is not bounded by `total_pages`, so it also
    /// recovers from a failed first load.
    pub fn reload(&mut self) -> PageRequest {
        self.issue()
    }

    /// Apply the result of a request.
    ///
    /// Returns `false` when the ticket is stale and the result was dropped.
    pub fn complete(
        &mut self,
        generation: u64,
        result: Result<ResultPage, CatalogError>,
    ) -> bool {
        if generation != self.generation {
            tracing::debug!(
                expected = self.generation,
                got = generation,
                "Ignoring stale catalog response (generation mismatch)"
            );
            return false;
        }

        match result {
            Ok(page) => {
                tracing::debug!(
                    mode = ?self.query.mode,
                    page = page.page,
                    total_pages = page.total_pages,
                    items = page.items.len(),
                    "Catalog page applied"
                );
                self.total_pages = page.total_pages;
                self.query.page = page.page.max(1);
                self.outcome = RequestOutcome::Success(page);
            }
            Err(e) => {
                tracing::warn!(
                    mode = ?self.query.mode,
                    page = self.query.page,
                    error = %e,
                    "Catalog request failed"
                );
                self.outcome = RequestOutcome::Failure(e.user_message());
            }
        }
        true
    }

    /// Fail the request with `generation` for a reason outside the catalog,
    /// such as the fetch task dying. Stale tickets are ignored as in `complete`.
    pub fn fail(&mut self, generation: u64, message: impl Into<String>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.outcome = RequestOutcome::Failure(message.into());
        true
    }

    /// Perform `request` against `source` and apply the result.
    pub async fn resolve<C: CatalogSource>(&mut self, source: &C, request: PageRequest) -> bool {
        let result = source.fetch_page(&request.query, request.page).await;
        self.complete(request.generation, result)
    }

    fn issue(&mut self) -> PageRequest {
        self.generation = self.generation.wrapping_add(1);
        self.outcome = RequestOutcome::Loading;
        PageRequest {
            generation: self.generation,
            query: self.current_query(),
            page: self.query.page,
        }
    }

    fn current_query(&self) -> CatalogQuery {
        match self.query.mode {
            Mode::Browse => CatalogQuery::Discover,
            Mode::Search => CatalogQuery::Search(self.query.search_text.clone()),
        }
    }

    // ------------------------------------------------------------------------
    // Read access for the renderer
    // ------------------------------------------------------------------------

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn mode(&self) -> Mode {
        self.query.mode
    }

    pub fn search_text(&self) -> &str {
        &self.query.search_text
    }

    pub fn page(&self) -> u32 {
        self.query.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn outcome(&self) -> &RequestOutcome {
        &self.outcome
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.outcome, RequestOutcome::Loading)
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.outcome {
            RequestOutcome::Failure(message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// Current results. Empty while loading and after a failure.
    pub fn items(&self) -> &[MovieSummary] {
        match &self.outcome {
            RequestOutcome::Success(page) => &page.items,
            _ => &[],
        }
    }

    pub fn phase(&self) -> Phase {
        match (&self.outcome, self.query.mode) {
            (RequestOutcome::Loading, _) => Phase::Loading,
            (RequestOutcome::Failure(_), _) => Phase::Error,
            (RequestOutcome::Success(_), Mode::Browse) => Phase::IdleBrowse,
            (RequestOutcome::Success(_), Mode::Search) => Phase::IdleSearch,
        }
    }

    pub fn latest_generation(&self) -> u64 {
        self.generation
    }
}
