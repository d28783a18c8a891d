//! Pagination State Machine
//!
//! Owns the item list and page cursor of one synchronizer. Every fetch is
//! split into `begin_*` (returns a `Ticket`) and `complete` so callers can
//! await the network in between. A ticket carries the generation it was
//! issued under; `begin_reset` bumps the generation, so any response that
//! arrives for an older generation is dropped without touching state.

use crate::error::ApiError;
use crate::optimistic::Keyed;
use crate::page::{Page, PageCursor, PageRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// First page in flight
    Loading,
    Ready,
    /// Next page in flight, existing items kept
    LoadingMore,
    ErrorFirstPage,
    ErrorAppend,
}

/// Proof of an issued fetch, handed back to `complete`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    request: PageRequest,
}

impl Ticket {
    pub fn request(&self) -> &PageRequest {
        &self.request
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What `complete` did with a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// Response belonged to a superseded query and was ignored
    Stale,
    Failed(ApiError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pager<T> {
    items: Vec<T>,
    cursor: PageCursor,
    phase: Phase,
    query: String,
    generation: u64,
    last_error: Option<ApiError>,
}

impl<T> Pager<T> {
    pub fn new(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            cursor: PageCursor::first(page_size),
            phase: Phase::Idle,
            query: String::new(),
            generation: 0,
            last_error: None,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn last_error(&self) -> Option<&ApiError> {
        self.last_error.as_ref()
    }

    pub fn has_more(&self) -> bool {
        self.cursor.has_more()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading | Phase::LoadingMore)
    }

    /// Clear the list and issue a fetch for page 1 of `query`.
    ///
    /// Any ticket issued before this call becomes stale.
    pub fn begin_reset(&mut self, query: impl Into<String>) -> Ticket {
        self.generation += 1;
        self.query = query.into();
        self.items.clear();
        self.cursor = PageCursor::first(self.cursor.page_size);
        self.phase = Phase::Loading;
        self.last_error = None;
        log::debug!("[Pager] reset gen={} query={:?}", self.generation, self.query);
        self.ticket(1)
    }

    /// Issue a fetch for the next page, or `None` when there is nothing to
    /// load or a fetch is already in flight.
    pub fn begin_load_more(&mut self) -> Option<Ticket> {
        if !self.has_more() || self.is_loading() {
            return None;
        }
        self.phase = Phase::LoadingMore;
        self.last_error = None;
        Some(self.ticket(self.cursor.current_page + 1))
    }

    /// Apply the outcome of a fetch issued by `begin_reset` / `begin_load_more`.
    pub fn complete(&mut self, ticket: Ticket, result: Result<Page<T>, ApiError>) -> Completion {
        if ticket.generation != self.generation {
            log::debug!(
                "[Pager] dropping stale page {} (gen {} != {})",
                ticket.request.page,
                ticket.generation,
                self.generation
            );
            return Completion::Stale;
        }
        let appending = match self.phase {
            Phase::Loading => false,
            Phase::LoadingMore => true,
            _ => return Completion::Stale,
        };
        match result {
            Ok(page) => {
                if appending {
                    self.items.extend(page.items);
                } else {
                    self.items = page.items;
                }
                self.cursor.current_page = page.current_page;
                self.cursor.last_page = page.last_page;
                self.phase = Phase::Ready;
                Completion::Applied
            }
            Err(error) => {
                // cursor and items stay as they were before the fetch
                self.phase = if appending { Phase::ErrorAppend } else { Phase::ErrorFirstPage };
                self.last_error = Some(error.clone());
                log::warn!("[Pager] page {} failed: {}", ticket.request.page, error);
                Completion::Failed(error)
            }
        }
    }

    /// Drop every item after the server confirmed the list is empty.
    /// In-flight fetches become stale.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.items.clear();
        self.cursor = PageCursor::first(self.cursor.page_size);
        self.phase = Phase::Ready;
        self.last_error = None;
    }

    pub(crate) fn items_mut(&mut self) -> &mut Vec<T> {
        &mut self.items
    }

    fn ticket(&self, page: u32) -> Ticket {
        Ticket {
            generation: self.generation,
            request: PageRequest {
                query: self.query.clone(),
                page,
                page_size: self.cursor.page_size,
            },
        }
    }
}

impl<T: Keyed> Pager<T> {
    /// Replace the item with the same key, or append it.
    pub fn upsert(&mut self, item: T) {
        let key = item.key();
        match self.items.iter_mut().find(|existing| existing.key() == key) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(items: &[u32], current_page: u32, last_page: u32) -> Result<Page<u32>, ApiError> {
        Ok(Page { items: items.to_vec(), current_page, last_page })
    }

    fn network() -> Result<Page<u32>, ApiError> {
        Err(ApiError::Network("offline".to_string()))
    }

    #[test]
    fn test_reset_replaces_items() {
        let mut pager = Pager::new(21);
        let ticket = pager.begin_reset("old");
        pager.complete(ticket, page(&[7, 8, 9], 1, 1));

        let ticket = pager.begin_reset("x");
        assert!(pager.items().is_empty());
        assert_eq!(ticket.request().page, 1);
        assert_eq!(ticket.request().page_size, 21);
        assert_eq!(pager.complete(ticket, page(&[1, 2], 1, 3)), Completion::Applied);

        assert_eq!(pager.items(), &[1, 2]);
        assert!(pager.has_more());
        assert_eq!(pager.phase(), Phase::Ready);
    }

    #[test]
    fn test_load_more_appends_in_order() {
        let mut pager = Pager::new(21);
        let ticket = pager.begin_reset("");
        pager.complete(ticket, page(&[1, 2], 1, 3));

        let ticket = pager.begin_load_more().unwrap();
        assert_eq!(ticket.request().page, 2);
        assert_eq!(pager.phase(), Phase::LoadingMore);
        pager.complete(ticket, page(&[3, 4], 2, 3));

        assert_eq!(pager.items(), &[1, 2, 3, 4]);
        assert_eq!(pager.cursor().current_page, 2);
        assert!(pager.has_more());
    }

    #[test]
    fn test_exhausted_load_more_is_noop() {
        let mut pager = Pager::new(12);
        let ticket = pager.begin_reset("");
        pager.complete(ticket, page(&[1], 1, 1));
        assert!(!pager.has_more());

        let before = pager.clone();
        assert!(pager.begin_load_more().is_none());
        assert_eq!(pager, before);
    }

    #[test]
    fn test_load_more_while_loading_is_noop() {
        let mut pager = Pager::<u32>::new(12);
        let _first = pager.begin_reset("");
        assert!(pager.begin_load_more().is_none());
    }

    #[test]
    fn test_second_load_more_while_in_flight_is_noop() {
        let mut pager = Pager::new(12);
        let ticket = pager.begin_reset("");
        pager.complete(ticket, page(&[1], 1, 4));
        let _in_flight = pager.begin_load_more().unwrap();
        assert!(pager.begin_load_more().is_none());
    }

    #[test]
    fn test_stale_reset_response_dropped() {
        let mut pager = Pager::new(21);
        let ticket_a = pager.begin_reset("a");
        let ticket_b = pager.begin_reset("b");
        assert_eq!(ticket_b.request().query, "b");

        assert_eq!(pager.complete(ticket_b, page(&[20, 21], 1, 1)), Completion::Applied);
        assert_eq!(pager.complete(ticket_a, page(&[10, 11], 1, 5)), Completion::Stale);

        assert_eq!(pager.items(), &[20, 21]);
        assert_eq!(pager.query(), "b");
        assert!(!pager.has_more());
    }

    #[test]
    fn test_reset_during_load_more_drops_append() {
        let mut pager = Pager::new(21);
        let ticket = pager.begin_reset("");
        pager.complete(ticket, page(&[1, 2], 1, 3));
        let append = pager.begin_load_more().unwrap();

        let ticket = pager.begin_reset("soup");
        assert_eq!(pager.complete(append, page(&[3, 4], 2, 3)), Completion::Stale);
        pager.complete(ticket, page(&[9], 1, 1));

        assert_eq!(pager.items(), &[9]);
    }

    #[test]
    fn test_first_page_failure_leaves_empty() {
        let mut pager = Pager::new(21);
        let ticket = pager.begin_reset("");
        let outcome = pager.complete(ticket, network());

        assert!(matches!(outcome, Completion::Failed(ApiError::Network(_))));
        assert!(pager.items().is_empty());
        assert!(!pager.is_loading());
        assert_eq!(pager.phase(), Phase::ErrorFirstPage);
        assert!(pager.last_error().is_some());
    }

    #[test]
    fn test_first_page_retry_keeps_query() {
        let mut pager = Pager::new(21);
        let ticket = pager.begin_reset("paella");
        pager.complete(ticket, network());
        assert_eq!(pager.query(), "paella");

        let query = pager.query().to_string();
        let retry = pager.begin_reset(query);
        assert_eq!(retry.request().query, "paella");
        assert_eq!(retry.request().page, 1);
        assert!(pager.last_error().is_none());

        pager.complete(retry, page(&[4], 1, 1));
        assert_eq!(pager.phase(), Phase::Ready);
        assert_eq!(pager.items(), &[4]);
    }

    #[test]
    fn test_append_failure_keeps_items_and_is_retriable() {
        let mut pager = Pager::new(21);
        let ticket = pager.begin_reset("");
        pager.complete(ticket, page(&[1, 2], 1, 3));

        let ticket = pager.begin_load_more().unwrap();
        pager.complete(ticket, network());
        assert_eq!(pager.phase(), Phase::ErrorAppend);
        assert_eq!(pager.items(), &[1, 2]);
        assert_eq!(pager.cursor().current_page, 1);

        let retry = pager.begin_load_more().unwrap();
        assert_eq!(retry.request().page, 2);
        pager.complete(retry, page(&[3], 2, 3));
        assert_eq!(pager.items(), &[1, 2, 3]);
        assert!(pager.last_error().is_none());
    }

    #[test]
    fn test_clear_drops_in_flight() {
        let mut pager = Pager::new(20);
        let ticket = pager.begin_reset("");
        pager.complete(ticket, page(&[1, 2], 1, 2));
        let append = pager.begin_load_more().unwrap();

        pager.clear();
        assert_eq!(pager.complete(append, page(&[3], 2, 2)), Completion::Stale);
        assert!(pager.items().is_empty());
        assert!(!pager.has_more());
    }
}
