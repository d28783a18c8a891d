//! Reactive List Bindings
//!
//! Glue between `list_sync` and Leptos. Feed state lives in an `RwSignal`
//! owned by the component that created it; once that component unmounts the
//! signal is disposed and every late response becomes a no-op.

use leptos::prelude::*;
use leptos::task::spawn_local;
use list_sync::{
    ApiError, Debouncer, FeedState, FetchGateway, Field, GlooTimer, KeyOf, ListSync, Phase, StateCell,
};

use crate::components::Toaster;

/// `StateCell` over a signal of the current reactive owner
pub struct SignalCell<S>(RwSignal<S>);

impl<S> Clone for SignalCell<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for SignalCell<S> {}

impl<S: Send + Sync + 'static> SignalCell<S> {
    pub fn new(state: S) -> Self {
        Self(RwSignal::new(state))
    }

    /// Tracked read
    pub fn with<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        self.0.with(f)
    }

    /// Untracked read; `None` once the owner is gone
    pub fn try_with_untracked<R>(&self, f: impl FnOnce(&S) -> R) -> Option<R> {
        self.0.try_with_untracked(f)
    }
}

impl<S: Send + Sync + 'static> StateCell<S> for SignalCell<S> {
    fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> Option<R> {
        self.0.try_update(f)
    }
}

pub type FeedStateOf<G> = FeedState<<G as FetchGateway>::Item, <G as FetchGateway>::Field>;
type FieldValue<G> = <<G as FetchGateway>::Field as Field<<G as FetchGateway>::Item>>::Value;

/// List synchronizer bound to the calling component
pub type Feed<G> = ListSync<SignalCell<FeedStateOf<G>>, G, Toaster>;

/// Copyable handle to a feed, usable from view closures. Actions run in the
/// background; their outcome shows up in the feed state and as toasts.
pub struct FeedHandle<G: FetchGateway> {
    sync: StoredValue<Feed<G>>,
    cell: SignalCell<FeedStateOf<G>>,
}

impl<G: FetchGateway> Clone for FeedHandle<G> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<G: FetchGateway> Copy for FeedHandle<G> {}

pub fn use_feed<G>(gateway: G, page_size: u32) -> FeedHandle<G>
where
    G: FetchGateway + Clone + Send + Sync + 'static,
    FeedStateOf<G>: Send + Sync,
{
    let toaster = expect_context::<Toaster>();
    let cell = SignalCell::new(FeedState::new(page_size));
    FeedHandle {
        sync: StoredValue::new(ListSync::new(cell, gateway, toaster)),
        cell,
    }
}

impl<G> FeedHandle<G>
where
    G: FetchGateway + Clone + Send + Sync + 'static,
    FeedStateOf<G>: Send + Sync,
{
    pub fn items(&self) -> Vec<G::Item> {
        self.cell.with(|state| state.pager.items().to_vec())
    }

    pub fn phase(&self) -> Phase {
        self.cell.with(|state| state.pager.phase())
    }

    /// Query of the list currently shown, untracked
    pub fn query(&self) -> String {
        self.cell
            .try_with_untracked(|state| state.pager.query().to_string())
            .unwrap_or_default()
    }

    /// Run the last reset again, e.g. after a failed first page
    pub fn retry(&self) {
        self.reset(self.query());
    }

    pub fn last_error(&self) -> Option<ApiError> {
        self.cell.with(|state| state.pager.last_error().cloned())
    }

    pub fn has_more(&self) -> bool {
        self.cell.with(|state| state.pager.has_more())
    }

    pub fn is_pending(&self, target: &KeyOf<G::Item>, field: G::Field) -> bool {
        self.cell.with(|state| state.mutations.is_pending(&state.pager, target, field))
    }

    pub fn reset(&self, query: String) {
        let Some(sync) = self.sync.try_get_value() else { return };
        spawn_local(async move {
            let outcome = sync.reset(query).await;
            log::debug!("[Feed] reset -> {:?}", outcome);
        });
    }

    pub fn load_more(&self) {
        let Some(sync) = self.sync.try_get_value() else { return };
        spawn_local(async move {
            let outcome = sync.load_more().await;
            log::debug!("[Feed] load_more -> {:?}", outcome);
        });
    }

    pub fn patch(&self, target: KeyOf<G::Item>, field: G::Field, value: FieldValue<G>) {
        let Some(sync) = self.sync.try_get_value() else { return };
        spawn_local(async move {
            let status = sync.apply_optimistic(target, field, value).await;
            log::debug!("[Feed] patch {:?} -> {:?}", field, status);
        });
    }

    pub fn remove(&self, target: KeyOf<G::Item>) {
        let Some(sync) = self.sync.try_get_value() else { return };
        spawn_local(async move {
            let status = sync.remove_optimistic(target).await;
            log::debug!("[Feed] remove -> {:?}", status);
        });
    }

    pub fn insert_confirmed(&self, item: G::Item) {
        self.sync.with_value(|sync| sync.insert_confirmed(item));
    }

    pub fn clear_confirmed(&self) {
        self.sync.with_value(|sync| sync.clear_confirmed());
    }
}

// ========================
// Debounced input
// ========================

/// Debounced copy of `raw`: follows it once `quiet_ms` pass without a change.
/// The pending timer is cancelled when the calling component unmounts.
pub fn use_debounced(raw: ReadSignal<String>, quiet_ms: u32) -> ReadSignal<String> {
    let initial = raw.get_untracked();
    let (debounced, set_debounced) = signal(initial.clone());

    let debouncer = StoredValue::new_local(Debouncer::new(
        GlooTimer,
        quiet_ms,
        initial,
        move |value: &str| set_debounced.set(value.to_string()),
    ));

    Effect::new(move |_| {
        let value = raw.get();
        debouncer.update_value(|debouncer| debouncer.input(value));
    });

    on_cleanup(move || {
        debouncer.try_update_value(|debouncer| debouncer.teardown());
    });

    debounced
}
