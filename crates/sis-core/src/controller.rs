//! Paginated list controller.
//!
//! Owns the query, pagination and page cache of one entity list, and is the
//! only thing allowed to fetch pages for it. The controller never performs I/O
//! itself: intent methods return [`FetchTicket`]s, the driver executes them
//! (see [`PaginatedListController::run_pending`]) and hands each result back
//! through [`PaginatedListController::complete`].
//!
//! Every ticket is tagged with the cache [`Generation`] it was issued under.
//! Results for an older generation are discarded on arrival, so a slow
//! response to a superseded filter can never populate the cache, clear the
//! loading flag, or change the total count.

use std::collections::{HashMap, VecDeque};

use sis_client::{ClientError, RemoteCollection};
use sis_model::{Entity, ModelError, PageQuery, SearchEnvelope, SortDirection};

use crate::alert::{AlertKind, AlertSink};
use crate::cache::{CachedPage, Generation, PageCache};
use crate::pagination::{PaginationState, page_count};
use crate::table::{ColumnDescriptor, DEFAULT_PAGE_SIZE, PaginationMode, TableEvent, TableView};

/// Kind of a confirmed write, used to pick the post-mutation refresh policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    /// A record was added.
    Create,
    /// A record was changed.
    Update,
    /// A record was removed.
    Delete,
}

impl MutationKind {
    /// Past-tense verb for messages.
    #[must_use]
    pub const fn past_tense(&self) -> &'static str {
        match self {
            Self::Create => "added",
            Self::Update => "updated",
            Self::Delete => "deleted",
        }
    }
}

/// Why a page is being fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// The page the user is looking at.
    Primary,
    /// The following page, fetched ahead of time.
    Prefetch,
}

/// A fetch the driver must execute and report back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    /// Cache generation the request belongs to.
    pub generation: Generation,
    /// Primary or prefetch.
    pub kind: FetchKind,
    /// Issue order. Only the latest ticket for a page may fill it.
    pub sequence: u64,
    /// Query to send.
    pub query: PageQuery,
}

impl FetchTicket {
    /// Page the ticket fetches.
    #[must_use]
    pub fn page_index(&self) -> usize {
        self.query.page_index
    }
}

/// What [`PaginatedListController::complete`] did with a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Rows were cached (and displayed, if the page is current).
    Applied,
    /// The ticket's generation is no longer active, or a newer request for
    /// the same page was issued after it; nothing changed.
    Stale,
    /// The displayed page failed to load; a danger alert was raised.
    Failed,
    /// A prefetch failed; the page stays uncached, no alert.
    PrefetchFailed,
    /// A page the user has since navigated away from failed; no alert.
    Dropped,
}

/// Result of [`PaginatedListController::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// What happened.
    pub outcome: FetchOutcome,
    /// Further fetches to run, e.g. after the page index was clamped.
    pub follow_up: Vec<FetchTicket>,
}

impl Completion {
    fn new(outcome: FetchOutcome) -> Self {
        Self {
            outcome,
            follow_up: Vec::new(),
        }
    }
}

/// A row slot of the displayed page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayRow<'a, E> {
    /// A fetched row.
    Row(&'a E),
    /// Empty stand-in shown while the page loads.
    Placeholder,
}

/// Query, pagination and cache state of one entity list.
#[derive(Debug)]
pub struct PaginatedListController<E: Entity> {
    query: PageQuery,
    cache: PageCache<E>,
    known_total: Option<usize>,
    loading: bool,
    /// Latest ticket sequence issued per page still awaiting a result.
    in_flight: HashMap<usize, u64>,
    next_sequence: u64,
    prefetch: bool,
}

impl<E: Entity> Default for PaginatedListController<E> {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl<E: Entity> PaginatedListController<E> {
    /// Controller on page 0, sorted ascending by the entity's default column.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            query: PageQuery::new(E::DEFAULT_SORT, page_size.max(1)),
            cache: PageCache::new(),
            known_total: None,
            loading: false,
            in_flight: HashMap::new(),
            next_sequence: 0,
            prefetch: true,
        }
    }

    /// Controller starting from an explicit query, e.g. one built from
    /// command-line flags. The page index is clamped once the total is known.
    pub fn from_query(query: PageQuery) -> Result<Self, ModelError> {
        let sort_column = E::sort_column(&query.sort_column)?;
        let mut controller = Self::new(query.page_size);
        controller.query = PageQuery {
            search_query: query.search_term().unwrap_or_default().to_string(),
            sort_column: sort_column.to_string(),
            ..controller.query
        }
        .with_direction(query.sort_direction)
        .with_page(query.page_index);
        Ok(controller)
    }

    /// Enable or disable next-page prefetching.
    #[must_use]
    pub fn with_prefetch(mut self, prefetch: bool) -> Self {
        self.prefetch = prefetch;
        self
    }

    // ------------------------------------------------------------------
    // Read accessors
    // ------------------------------------------------------------------

    /// The active query.
    #[must_use]
    pub fn query(&self) -> &PageQuery {
        &self.query
    }

    /// The active cache generation.
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.cache.generation()
    }

    /// Current page (0-indexed).
    #[must_use]
    pub fn page_index(&self) -> usize {
        self.query.page_index
    }

    /// Rows per page.
    #[must_use]
    pub fn page_size(&self) -> usize {
        self.query.page_size
    }

    /// Whether the displayed page is being fetched.
    #[must_use]
    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Size of the filtered set. Reported as 0 while loading.
    #[must_use]
    pub fn total_count(&self) -> usize {
        if self.loading {
            0
        } else {
            self.known_total.unwrap_or(0)
        }
    }

    /// `ceil(total_count / page_size)`.
    #[must_use]
    pub fn page_count(&self) -> usize {
        page_count(self.total_count(), self.query.page_size)
    }

    /// Pagination snapshot for rendering.
    #[must_use]
    pub fn pagination(&self) -> PaginationState {
        PaginationState {
            page_index: self.query.page_index,
            page_size: self.query.page_size,
            total_count: self.total_count(),
        }
    }

    /// Rows of the displayed page; empty while loading.
    #[must_use]
    pub fn current_page_rows(&self) -> &[E] {
        if self.loading {
            return &[];
        }
        self.current_entry().map_or(&[], |page| page.rows.as_slice())
    }

    /// Rows to render: `page_size` placeholders while loading, the page otherwise.
    #[must_use]
    pub fn display_rows(&self) -> Vec<DisplayRow<'_, E>> {
        if self.loading {
            vec![DisplayRow::Placeholder; self.query.page_size]
        } else {
            self.current_page_rows().iter().map(DisplayRow::Row).collect()
        }
    }

    /// Server-side table projection of the displayed page.
    #[must_use]
    pub fn table_view(&self) -> TableView {
        let columns = ColumnDescriptor::for_entity::<E>();
        let rows = self
            .display_rows()
            .into_iter()
            .map(|row| match row {
                DisplayRow::Row(record) => record.cells(),
                DisplayRow::Placeholder => vec![String::new(); columns.len()],
            })
            .collect();
        TableView {
            columns,
            rows,
            page_index: self.query.page_index,
            page_size: self.query.page_size,
            mode: PaginationMode::Server {
                total_count: self.total_count(),
            },
            loading: self.loading,
        }
    }

    /// The page cache, read-only.
    #[must_use]
    pub fn cache(&self) -> &PageCache<E> {
        &self.cache
    }

    // ------------------------------------------------------------------
    // Intents
    // ------------------------------------------------------------------

    /// Initial load of the current page.
    pub fn start(&mut self) -> Vec<FetchTicket> {
        self.plan(false)
    }

    /// Change the search text. Blank clears the filter.
    pub fn set_search_query(&mut self, search: &str) -> Vec<FetchTicket> {
        let search = search.trim();
        if search == self.query.search_query {
            return Vec::new();
        }
        self.query.search_query = search.to_string();
        self.change_filter()
    }

    /// Change the sort column. Unknown columns are rejected.
    pub fn set_sort_column(&mut self, column: &str) -> Result<Vec<FetchTicket>, ModelError> {
        let column = E::sort_column(column)?;
        if column == self.query.sort_column {
            return Ok(Vec::new());
        }
        self.query.sort_column = column.to_string();
        Ok(self.change_filter())
    }

    /// Change the sort direction.
    pub fn set_sort_direction(&mut self, direction: SortDirection) -> Vec<FetchTicket> {
        if direction == self.query.sort_direction {
            return Vec::new();
        }
        self.query.sort_direction = direction;
        self.change_filter()
    }

    /// Flip the sort direction.
    pub fn toggle_sort_direction(&mut self) -> Vec<FetchTicket> {
        self.set_sort_direction(self.query.sort_direction.toggle())
    }

    /// Change the page size. Zero is ignored.
    pub fn set_page_size(&mut self, page_size: usize) -> Vec<FetchTicket> {
        if page_size == 0 {
            tracing::warn!(entity = E::PATH, "ignoring page size of zero");
            return Vec::new();
        }
        if page_size == self.query.page_size {
            return Vec::new();
        }
        self.query.page_size = page_size;
        self.change_filter()
    }

    /// Navigate, clamping into `[0, max(page_count - 1, 0)]`.
    pub fn set_page_index(&mut self, requested: usize) -> Vec<FetchTicket> {
        let known = PaginationState {
            page_index: self.query.page_index,
            page_size: self.query.page_size,
            total_count: self.known_total.unwrap_or(0),
        };
        self.query.page_index = known.clamped(requested);
        self.plan(false)
    }

    /// Go one page forward, if possible.
    pub fn next_page(&mut self) -> Vec<FetchTicket> {
        self.set_page_index(self.query.page_index.saturating_add(1))
    }

    /// Go one page back, if possible.
    pub fn previous_page(&mut self) -> Vec<FetchTicket> {
        self.set_page_index(self.query.page_index.saturating_sub(1))
    }

    /// Apply a table intent.
    pub fn handle_event(&mut self, event: TableEvent) -> Vec<FetchTicket> {
        match event {
            TableEvent::PageChanged(index) => self.set_page_index(index),
            TableEvent::PageSizeChanged(size) => self.set_page_size(size),
            // Server-side mode: the count is derived from the total here.
            TableEvent::PageCountChanged(_) => Vec::new(),
        }
    }

    /// Re-fetch the current page, bypassing its cache entry.
    pub fn refresh(&mut self) -> Vec<FetchTicket> {
        self.cache
            .evict(self.query.page_index, self.query.page_size);
        self.plan(true)
    }

    /// Bring the list up to date after a confirmed write.
    ///
    /// Every cached page may have shifted, so the cache is dropped. A create
    /// also returns to page 0 so the new row is reachable under the default
    /// ordering. Updates and deletes keep the page; if a delete shrinks the
    /// page count, the index is clamped when the fresh total arrives.
    pub fn apply_mutation(&mut self, kind: MutationKind) -> Vec<FetchTicket> {
        if kind == MutationKind::Create {
            self.query.page_index = 0;
        }
        self.reset_generation();
        self.plan(false)
    }

    // ------------------------------------------------------------------
    // Results
    // ------------------------------------------------------------------

    /// Apply or discard the result of `ticket`.
    pub fn complete<A, S: AlertSink<A>>(
        &mut self,
        ticket: FetchTicket,
        result: Result<SearchEnvelope<E>, ClientError>,
        alerts: &mut S,
    ) -> Completion {
        let generation = self.cache.generation();
        let page = ticket.query.page_index;
        if ticket.generation != generation {
            tracing::warn!(
                entity = E::PATH,
                ticket = %ticket.generation,
                active = %generation,
                page,
                "discarding stale response"
            );
            return Completion::new(FetchOutcome::Stale);
        }

        if self.in_flight.get(&page) != Some(&ticket.sequence) {
            tracing::warn!(
                entity = E::PATH,
                page,
                sequence = ticket.sequence,
                "discarding superseded response"
            );
            return Completion::new(FetchOutcome::Stale);
        }
        self.in_flight.remove(&page);
        let is_current = page == self.query.page_index;

        match result {
            Ok(envelope) => {
                let total = envelope.total_count;
                self.cache.put(
                    generation,
                    page,
                    self.query.page_size,
                    CachedPage {
                        rows: envelope.rows,
                        total_count: total,
                    },
                );
                self.known_total = Some(total);
                tracing::debug!(entity = E::PATH, %generation, page, total, "page cached");

                let mut completion = Completion::new(FetchOutcome::Applied);
                if is_current {
                    self.loading = false;
                    let mut state = PaginationState {
                        page_index: page,
                        page_size: self.query.page_size,
                        total_count: total,
                    };
                    if state.set_total_count(total) {
                        tracing::debug!(
                            entity = E::PATH,
                            from = page,
                            to = state.page_index,
                            "page index clamped to new page count"
                        );
                        self.query.page_index = state.page_index;
                        completion.follow_up = self.plan(false);
                    }
                }
                completion
            }
            Err(err) if is_current => {
                self.loading = false;
                tracing::error!(entity = E::PATH, page, error = %err, "failed to load page");
                alerts.notify(AlertKind::Danger, err.user_message());
                Completion::new(FetchOutcome::Failed)
            }
            Err(err) => {
                tracing::warn!(entity = E::PATH, page, kind = ?ticket.kind, error = %err, "background fetch failed");
                Completion::new(match ticket.kind {
                    FetchKind::Prefetch => FetchOutcome::PrefetchFailed,
                    FetchKind::Primary => FetchOutcome::Dropped,
                })
            }
        }
    }

    /// Execute `tickets` one after another against `client`, including any follow-ups.
    pub async fn run_pending<C, A, S>(
        &mut self,
        client: &C,
        tickets: Vec<FetchTicket>,
        alerts: &mut S,
    ) -> Vec<FetchOutcome>
    where
        C: RemoteCollection<E>,
        S: AlertSink<A>,
    {
        let mut queue = VecDeque::from(tickets);
        let mut outcomes = Vec::with_capacity(queue.len());
        while let Some(ticket) = queue.pop_front() {
            let result = client.search(&ticket.query).await;
            let completion = self.complete::<A, S>(ticket, result, alerts);
            outcomes.push(completion.outcome);
            queue.extend(completion.follow_up);
        }
        outcomes
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn current_entry(&self) -> Option<&CachedPage<E>> {
        self.cache.get(
            self.cache.generation(),
            self.query.page_index,
            self.query.page_size,
        )
    }

    fn change_filter(&mut self) -> Vec<FetchTicket> {
        self.query.page_index = 0;
        self.reset_generation();
        self.plan(false)
    }

    fn reset_generation(&mut self) {
        let generation = self.cache.invalidate_all();
        self.in_flight.clear();
        self.known_total = None;
        tracing::debug!(entity = E::PATH, %generation, "page cache invalidated");
    }

    fn issue(&mut self, page_index: usize, kind: FetchKind) -> FetchTicket {
        self.next_sequence += 1;
        self.in_flight.insert(page_index, self.next_sequence);
        let ticket = FetchTicket {
            generation: self.cache.generation(),
            kind,
            sequence: self.next_sequence,
            query: self.query.at_page(page_index),
        };
        tracing::debug!(
            entity = E::PATH,
            generation = %ticket.generation,
            page = page_index,
            kind = ?kind,
            "issuing fetch"
        );
        ticket
    }

    fn plan(&mut self, force_current: bool) -> Vec<FetchTicket> {
        let generation = self.cache.generation();
        let page = self.query.page_index;
        let size = self.query.page_size;
        let mut tickets = Vec::new();

        match self.cache.get(generation, page, size).map(|entry| entry.total_count) {
            Some(total) if !force_current => {
                self.known_total = Some(total);
                self.loading = false;
            }
            _ => {
                self.loading = true;
                if force_current || !self.in_flight.contains_key(&page) {
                    tickets.push(self.issue(page, FetchKind::Primary));
                }
            }
        }

        if self.prefetch {
            let next = page + 1;
            let next_exists = self
                .known_total
                .is_none_or(|total| next < page_count(total, size));
            if next_exists
                && !self.cache.contains(generation, next, size)
                && !self.in_flight.contains_key(&next)
            {
                tickets.push(self.issue(next, FetchKind::Prefetch));
            }
        }
        tickets
    }
}
