//! List Synchronizer
//!
//! Async driver around `Pager` and `Mutations`. State lives behind a
//! `StateCell` and is only borrowed between awaits, never across one.
//! Failures are turned into state flags plus a notification; nothing here
//! returns an error to the caller that it must handle.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::ApiError;
use crate::gateway::{FetchGateway, Notifier};
use crate::optimistic::{Field, KeyOf, Keyed, MutationIntent, MutationStatus, Mutations};
use crate::pagination::{Completion, Pager, Ticket};

/// Shared, owner-scoped state
pub trait StateCell<S> {
    /// Run `f` against the state; `None` once the owner has been torn down.
    fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> Option<R>;
}

impl<S> StateCell<S> for Rc<RefCell<S>> {
    fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> Option<R> {
        Some(f(&mut self.borrow_mut()))
    }
}

#[derive(Debug, Clone)]
pub struct FeedState<T: Keyed, F: Field<T>> {
    pub pager: Pager<T>,
    pub mutations: Mutations<T, F>,
}

impl<T: Keyed, F: Field<T>> FeedState<T, F> {
    pub fn new(page_size: u32) -> Self {
        Self {
            pager: Pager::new(page_size),
            mutations: Mutations::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Applied,
    /// Nothing to do (exhausted, or a fetch already in flight)
    Skipped,
    /// Response arrived for a superseded query
    Stale,
    Failed(ApiError),
    /// State owner is gone
    Detached,
}

#[derive(Clone)]
pub struct ListSync<C, G, N> {
    cell: C,
    gateway: G,
    notifier: N,
}

type ValueOf<G> = <<G as FetchGateway>::Field as Field<<G as FetchGateway>::Item>>::Value;

impl<C, G, N> ListSync<C, G, N>
where
    G: FetchGateway,
    C: StateCell<FeedState<G::Item, G::Field>>,
    N: Notifier,
{
    pub fn new(cell: C, gateway: G, notifier: N) -> Self {
        Self { cell, gateway, notifier }
    }

    pub fn cell(&self) -> &C {
        &self.cell
    }

    /// Replace the list with page 1 of `query`.
    pub async fn reset(&self, query: impl Into<String>) -> SyncOutcome {
        let query = query.into();
        match self.cell.update(|state| state.pager.begin_reset(query)) {
            Some(ticket) => self.fetch(ticket).await,
            None => SyncOutcome::Detached,
        }
    }

    /// Append the next page, if any.
    pub async fn load_more(&self) -> SyncOutcome {
        match self.cell.update(|state| state.pager.begin_load_more()) {
            Some(Some(ticket)) => self.fetch(ticket).await,
            Some(None) => SyncOutcome::Skipped,
            None => SyncOutcome::Detached,
        }
    }

    /// Patch `field` of `target` now and confirm with the server.
    ///
    /// Returns `None` when the patch was not applied (unknown item, same
    /// field already pending, or owner gone).
    pub async fn apply_optimistic(
        &self,
        target: KeyOf<G::Item>,
        field: G::Field,
        value: ValueOf<G>,
    ) -> Option<MutationStatus> {
        let intent = self
            .cell
            .update(|state| state.mutations.begin_set(&mut state.pager, target, field, value))
            .flatten()?;
        self.confirm(intent).await
    }

    /// Remove `target` now and confirm with the server.
    pub async fn remove_optimistic(&self, target: KeyOf<G::Item>) -> Option<MutationStatus> {
        let intent = self
            .cell
            .update(|state| state.mutations.begin_remove(&mut state.pager, target))
            .flatten()?;
        self.confirm(intent).await
    }

    /// Add or replace an item the server has already accepted.
    pub fn insert_confirmed(&self, item: G::Item) {
        self.cell.update(|state| state.pager.upsert(item));
    }

    /// Empty the list after the server has cleared it.
    pub fn clear_confirmed(&self) {
        self.cell.update(|state| state.pager.clear());
    }

    async fn fetch(&self, ticket: Ticket) -> SyncOutcome {
        let result = self.gateway.fetch_page(ticket.request()).await;
        match self.cell.update(|state| state.pager.complete(ticket, result)) {
            Some(Completion::Applied) => SyncOutcome::Applied,
            Some(Completion::Stale) => SyncOutcome::Stale,
            Some(Completion::Failed(error)) => {
                self.notifier.error(&error);
                SyncOutcome::Failed(error)
            }
            None => SyncOutcome::Detached,
        }
    }

    async fn confirm(&self, intent: MutationIntent<G::Item, G::Field>) -> Option<MutationStatus> {
        let result = self.gateway.mutate(&intent.target_id, &intent.change).await;
        match &result {
            Ok(ack) if !ack.message.is_empty() => self.notifier.success(&ack.message),
            Ok(_) => {}
            Err(error) => self.notifier.error(error),
        }
        let result = result.map(|_| ());
        self.cell
            .update(|state| state.mutations.settle(&mut state.pager, intent, result))
            .map(|intent| intent.status)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use async_trait::async_trait;
    use tokio::sync::oneshot;

    use super::*;
    use crate::debounce::{Debouncer, QUIET_PERIOD_MS};
    use crate::gateway::Ack;
    use crate::optimistic::Change;
    use crate::page::{Page, PageRequest};
    use crate::pagination::Phase;
    use crate::testing::ManualTimer;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: u32,
        favorite: bool,
    }

    impl Keyed for Row {
        type Key = u32;

        fn key(&self) -> u32 {
            self.id
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    struct Favorite;

    impl Field<Row> for Favorite {
        type Value = bool;

        fn read(&self, item: &Row) -> bool {
            item.favorite
        }

        fn write(&self, item: &mut Row, value: bool) {
            item.favorite = value;
        }
    }

    type PageResult = Result<Page<Row>, ApiError>;
    type AckResult = Result<Ack, ApiError>;

    enum Reply<R> {
        Now(R),
        Later(oneshot::Receiver<R>),
    }

    /// Gateway answering from scripted replies, in call order
    #[derive(Clone, Default)]
    struct Scripted {
        pages: Rc<RefCell<VecDeque<Reply<PageResult>>>>,
        acks: Rc<RefCell<VecDeque<Reply<AckResult>>>>,
        requests: Rc<RefCell<Vec<PageRequest>>>,
    }

    impl Scripted {
        fn page_now(&self, ids: &[u32], current_page: u32, last_page: u32) {
            let items = ids.iter().map(|id| Row { id: *id, favorite: false }).collect();
            self.pages
                .borrow_mut()
                .push_back(Reply::Now(Ok(Page { items, current_page, last_page })));
        }

        fn page_later(&self) -> oneshot::Sender<PageResult> {
            let (tx, rx) = oneshot::channel();
            self.pages.borrow_mut().push_back(Reply::Later(rx));
            tx
        }

        fn page_error(&self, error: ApiError) {
            self.pages.borrow_mut().push_back(Reply::Now(Err(error)));
        }

        fn ack_now(&self, result: AckResult) {
            self.acks.borrow_mut().push_back(Reply::Now(result));
        }

        fn ack_later(&self) -> oneshot::Sender<AckResult> {
            let (tx, rx) = oneshot::channel();
            self.acks.borrow_mut().push_back(Reply::Later(rx));
            tx
        }
    }

    async fn answer<R>(reply: Option<Reply<Result<R, ApiError>>>) -> Result<R, ApiError> {
        match reply {
            Some(Reply::Now(result)) => result,
            Some(Reply::Later(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(ApiError::Network("reply dropped".to_string()))),
            None => Err(ApiError::Network("no scripted reply".to_string())),
        }
    }

    #[async_trait(?Send)]
    impl FetchGateway for Scripted {
        type Item = Row;
        type Field = Favorite;

        async fn fetch_page(&self, request: &PageRequest) -> PageResult {
            self.requests.borrow_mut().push(request.clone());
            let reply = self.pages.borrow_mut().pop_front();
            answer(reply).await
        }

        async fn mutate(&self, _target: &u32, _change: &Change<Row, Favorite>) -> AckResult {
            let reply = self.acks.borrow_mut().pop_front();
            answer(reply).await
        }
    }

    #[derive(Clone, Default)]
    struct Recorder {
        errors: Rc<RefCell<Vec<ApiError>>>,
        successes: Rc<RefCell<Vec<String>>>,
    }

    impl Notifier for Recorder {
        fn error(&self, error: &ApiError) {
            self.errors.borrow_mut().push(error.clone());
        }

        fn success(&self, message: &str) {
            self.successes.borrow_mut().push(message.to_string());
        }
    }

    type Cell = Rc<RefCell<FeedState<Row, Favorite>>>;

    fn sync(page_size: u32) -> (ListSync<Cell, Scripted, Recorder>, Scripted, Recorder) {
        let gateway = Scripted::default();
        let notifier = Recorder::default();
        let cell = Rc::new(RefCell::new(FeedState::new(page_size)));
        (ListSync::new(cell, gateway.clone(), notifier.clone()), gateway, notifier)
    }

    fn ids(sync: &ListSync<Cell, Scripted, Recorder>) -> Vec<u32> {
        sync.cell().borrow().pager.items().iter().map(|row| row.id).collect()
    }

    #[tokio::test]
    async fn test_reset_then_load_more() {
        let (sync, gateway, _) = sync(21);
        gateway.page_now(&[1, 2], 1, 3);
        gateway.page_now(&[3, 4], 2, 3);

        assert_eq!(sync.reset("x").await, SyncOutcome::Applied);
        assert_eq!(ids(&sync), vec![1, 2]);
        assert!(sync.cell().borrow().pager.has_more());

        assert_eq!(sync.load_more().await, SyncOutcome::Applied);
        assert_eq!(ids(&sync), vec![1, 2, 3, 4]);

        let requests = gateway.requests.borrow();
        assert_eq!(requests[0], PageRequest { query: "x".to_string(), page: 1, page_size: 21 });
        assert_eq!(requests[1].page, 2);
        assert_eq!(requests[1].query, "x");
    }

    /// Search box wiring: every debounced emission resets the feed once
    async fn drain_into_resets(emitted: &Rc<RefCell<Vec<String>>>, sync: &ListSync<Cell, Scripted, Recorder>) {
        let queries: Vec<String> = emitted.borrow_mut().drain(..).collect();
        for query in queries {
            sync.reset(query).await;
        }
    }

    #[tokio::test]
    async fn test_debounced_typing_resets_once() {
        let (sync, gateway, _) = sync(21);
        gateway.page_now(&[5, 6], 1, 1);

        let timer = ManualTimer::default();
        let emitted = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&emitted);
        let mut debouncer = Debouncer::new(timer.clone(), QUIET_PERIOD_MS, "", move |query: &str| {
            sink.borrow_mut().push(query.to_string())
        });

        for (at, text) in [(0, "p"), (150, "pa"), (300, "pae"), (450, "paella")] {
            timer.advance_to(at);
            debouncer.input(text);
            drain_into_resets(&emitted, &sync).await;
        }
        timer.advance_to(1449);
        drain_into_resets(&emitted, &sync).await;
        assert!(gateway.requests.borrow().is_empty());

        timer.advance_to(1450);
        drain_into_resets(&emitted, &sync).await;

        // retyping the same term after it settled is not a new query
        debouncer.input("paell");
        timer.advance_to(1600);
        debouncer.input("paella");
        timer.advance_to(5000);
        drain_into_resets(&emitted, &sync).await;

        let requests = gateway.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].query, "paella");
        assert_eq!(requests[0].page, 1);
        assert_eq!(ids(&sync), vec![5, 6]);
    }

    #[tokio::test]
    async fn test_exhausted_issues_no_request() {
        let (sync, gateway, _) = sync(12);
        gateway.page_now(&[1], 1, 1);
        sync.reset("").await;

        assert_eq!(sync.load_more().await, SyncOutcome::Skipped);
        assert_eq!(gateway.requests.borrow().len(), 1);
        assert_eq!(ids(&sync), vec![1]);
    }

    #[tokio::test]
    async fn test_late_response_for_old_query_dropped() {
        let (sync, gateway, _) = sync(21);
        let reply_a = gateway.page_later();
        let reply_b = gateway.page_later();

        let (outcome_a, outcome_b, _) = tokio::join!(sync.reset("a"), sync.reset("b"), async {
            let b = Page { items: vec![Row { id: 20, favorite: false }], current_page: 1, last_page: 1 };
            reply_b.send(Ok(b)).ok();
            tokio::task::yield_now().await;
            let a = Page { items: vec![Row { id: 10, favorite: false }], current_page: 1, last_page: 4 };
            reply_a.send(Ok(a)).ok();
        });

        assert_eq!(outcome_a, SyncOutcome::Stale);
        assert_eq!(outcome_b, SyncOutcome::Applied);
        assert_eq!(ids(&sync), vec![20]);
        assert!(!sync.cell().borrow().pager.has_more());
    }

    #[tokio::test]
    async fn test_failed_first_page_notifies_once() {
        let (sync, gateway, notifier) = sync(21);
        gateway.page_error(ApiError::Network("offline".to_string()));

        let outcome = sync.reset("").await;

        assert!(matches!(outcome, SyncOutcome::Failed(ApiError::Network(_))));
        let state = sync.cell().borrow();
        assert!(state.pager.items().is_empty());
        assert!(!state.pager.is_loading());
        assert_eq!(state.pager.phase(), Phase::ErrorFirstPage);
        assert_eq!(notifier.errors.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_repeated_failures_repeat_notifications() {
        let (sync, gateway, notifier) = sync(21);
        gateway.page_now(&[1], 1, 2);
        gateway.page_error(ApiError::Auth);
        gateway.page_error(ApiError::Auth);
        sync.reset("").await;

        sync.load_more().await;
        sync.load_more().await;

        assert_eq!(*notifier.errors.borrow(), vec![ApiError::Auth, ApiError::Auth]);
        assert_eq!(ids(&sync), vec![1]);
        assert_eq!(sync.cell().borrow().pager.phase(), Phase::ErrorAppend);
    }

    #[tokio::test]
    async fn test_optimistic_rollback_and_commit() {
        let (sync, gateway, notifier) = sync(21);
        gateway.page_now(&[1, 2], 1, 1);
        sync.reset("").await;

        gateway.ack_now(Err(ApiError::Validation("duplicate favourite".to_string())));
        let status = sync.apply_optimistic(1, Favorite, true).await;
        assert_eq!(status, Some(MutationStatus::RolledBack));
        assert!(sync.cell().borrow().pager.items().iter().all(|row| !row.favorite));
        assert_eq!(notifier.errors.borrow().len(), 1);

        gateway.ack_now(Ok(Ack { message: "Added to favourites".to_string() }));
        let status = sync.apply_optimistic(1, Favorite, true).await;
        assert_eq!(status, Some(MutationStatus::Committed));
        assert!(sync.cell().borrow().pager.items()[0].favorite);
        assert_eq!(*notifier.successes.borrow(), vec!["Added to favourites".to_string()]);
    }

    #[tokio::test]
    async fn test_optimistic_value_visible_before_confirmation() {
        let (sync, gateway, _) = sync(21);
        gateway.page_now(&[1], 1, 1);
        sync.reset("").await;
        let ack = gateway.ack_later();

        let (status, _) = tokio::join!(sync.apply_optimistic(1, Favorite, true), async {
            assert!(sync.cell().borrow().pager.items()[0].favorite);
            // double click while pending is ignored
            assert_eq!(sync.apply_optimistic(1, Favorite, false).await, None);
            ack.send(Ok(Ack::default())).ok();
        });

        assert_eq!(status, Some(MutationStatus::Committed));
        assert!(sync.cell().borrow().pager.items()[0].favorite);
    }

    #[tokio::test]
    async fn test_reset_mid_mutation_keeps_new_list() {
        let (sync, gateway, _) = sync(21);
        gateway.page_now(&[1, 2], 1, 1);
        sync.reset("").await;
        let ack = gateway.ack_later();
        gateway.page_now(&[5], 1, 1);

        let (removed, outcome) = tokio::join!(sync.remove_optimistic(1), async {
            let outcome = sync.reset("eggs").await;
            ack.send(Err(ApiError::Server { status: 500, message: "boom".to_string() })).ok();
            outcome
        });

        assert_eq!(outcome, SyncOutcome::Applied);
        assert_eq!(removed, Some(MutationStatus::RolledBack));
        assert_eq!(ids(&sync), vec![5]);
    }

    #[tokio::test]
    async fn test_confirmed_edits() {
        let (sync, gateway, _) = sync(20);
        gateway.page_now(&[1, 2], 1, 1);
        sync.reset("").await;

        sync.insert_confirmed(Row { id: 3, favorite: false });
        sync.insert_confirmed(Row { id: 1, favorite: true });
        assert_eq!(ids(&sync), vec![1, 2, 3]);
        assert!(sync.cell().borrow().pager.items()[0].favorite);

        sync.clear_confirmed();
        assert!(ids(&sync).is_empty());
    }

    /// Cell whose owner has already been disposed
    struct Disposed;

    impl StateCell<FeedState<Row, Favorite>> for Disposed {
        fn update<R>(&self, _f: impl FnOnce(&mut FeedState<Row, Favorite>) -> R) -> Option<R> {
            None
        }
    }

    #[tokio::test]
    async fn test_detached_owner_is_noop() {
        let gateway = Scripted::default();
        let notifier = Recorder::default();
        let sync = ListSync::new(Disposed, gateway.clone(), notifier.clone());

        assert_eq!(sync.reset("x").await, SyncOutcome::Detached);
        assert_eq!(sync.load_more().await, SyncOutcome::Detached);
        assert_eq!(sync.apply_optimistic(1, Favorite, true).await, None);
        assert!(gateway.requests.borrow().is_empty());
        assert!(notifier.errors.borrow().is_empty());
    }
}
