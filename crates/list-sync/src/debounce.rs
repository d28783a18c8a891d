//! Debounced Query Controller
//!
//! Turns raw keystrokes into a stable query. Each input cancels the pending
//! emission and starts a new quiet period; the value is emitted only when the
//! period elapses without further input, and only if it differs from the last
//! emitted value.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::Timeout;

/// Quiet period before a search term is considered stable
pub const QUIET_PERIOD_MS: u32 = 1000;

/// Start/cancel timer primitive
pub trait Timer {
    type Handle;

    fn start(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> Self::Handle;
    fn cancel(&self, handle: Self::Handle);
}

/// Browser `setTimeout` timer
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTimer;

impl Timer for GlooTimer {
    type Handle = Timeout;

    fn start(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> Timeout {
        Timeout::new(delay_ms, callback)
    }

    fn cancel(&self, handle: Timeout) {
        // dropping a Timeout clears it
        drop(handle);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    pub raw_input: String,
    pub debounced_value: String,
}

pub struct Debouncer<T: Timer> {
    timer: T,
    quiet_ms: u32,
    state: Rc<RefCell<QueryState>>,
    on_emit: Rc<dyn Fn(&str)>,
    pending: Option<T::Handle>,
    alive: Rc<Cell<bool>>,
}

impl<T: Timer> Debouncer<T> {
    /// `initial` counts as already emitted.
    pub fn new(timer: T, quiet_ms: u32, initial: impl Into<String>, on_emit: impl Fn(&str) + 'static) -> Self {
        let initial = initial.into();
        Self {
            timer,
            quiet_ms,
            state: Rc::new(RefCell::new(QueryState {
                raw_input: initial.clone(),
                debounced_value: initial,
            })),
            on_emit: Rc::new(on_emit),
            pending: None,
            alive: Rc::new(Cell::new(true)),
        }
    }

    pub fn input(&mut self, raw: impl Into<String>) {
        if !self.alive.get() {
            return;
        }
        let raw = raw.into();
        self.cancel_pending();
        self.state.borrow_mut().raw_input = raw.clone();

        let state = Rc::clone(&self.state);
        let on_emit = Rc::clone(&self.on_emit);
        let alive = Rc::clone(&self.alive);
        let handle = self.timer.start(
            self.quiet_ms,
            Box::new(move || {
                if !alive.get() {
                    return;
                }
                let changed = {
                    let mut state = state.borrow_mut();
                    if state.debounced_value == raw {
                        false
                    } else {
                        state.debounced_value = raw.clone();
                        true
                    }
                };
                if changed {
                    on_emit(&raw);
                }
            }),
        );
        self.pending = Some(handle);
    }

    /// Cancel any pending emission and stop accepting input.
    pub fn teardown(&mut self) {
        self.alive.set(false);
        self.cancel_pending();
    }

    pub fn state(&self) -> QueryState {
        self.state.borrow().clone()
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.timer.cancel(handle);
        }
    }
}

impl<T: Timer> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ManualTimer;

    fn recorder(timer: &ManualTimer) -> (Rc<RefCell<Vec<(u64, String)>>>, impl Fn(&str) + 'static) {
        let emitted = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&emitted);
        let clock = timer.clone();
        (emitted, move |value: &str| sink.borrow_mut().push((clock.now(), value.to_string())))
    }

    #[test]
    fn test_only_final_value_emitted() {
        let timer = ManualTimer::default();
        let (emitted, on_emit) = recorder(&timer);
        let mut debouncer = Debouncer::new(timer.clone(), QUIET_PERIOD_MS, "", on_emit);

        debouncer.input("a");
        timer.advance_to(100);
        debouncer.input("ap");
        timer.advance_to(200);
        debouncer.input("app");

        timer.advance_to(1199);
        assert!(emitted.borrow().is_empty());
        assert_eq!(debouncer.state().raw_input, "app");

        timer.advance_to(5000);
        assert_eq!(*emitted.borrow(), vec![(1200, "app".to_string())]);
        assert_eq!(debouncer.state().debounced_value, "app");
    }

    #[test]
    fn test_unchanged_value_not_reemitted() {
        let timer = ManualTimer::default();
        let (emitted, on_emit) = recorder(&timer);
        let mut debouncer = Debouncer::new(timer.clone(), QUIET_PERIOD_MS, "", on_emit);

        debouncer.input("soup");
        timer.advance_to(1000);
        debouncer.input("soups");
        timer.advance_to(1500);
        debouncer.input("soup");
        timer.advance_to(3000);

        assert_eq!(*emitted.borrow(), vec![(1000, "soup".to_string())]);
    }

    #[test]
    fn test_teardown_cancels_pending() {
        let timer = ManualTimer::default();
        let (emitted, on_emit) = recorder(&timer);
        let mut debouncer = Debouncer::new(timer.clone(), QUIET_PERIOD_MS, "", on_emit);

        debouncer.input("pasta");
        assert_eq!(timer.scheduled(), 1);
        debouncer.teardown();
        assert_eq!(timer.scheduled(), 0);

        debouncer.input("late");
        timer.advance_to(10_000);
        assert!(emitted.borrow().is_empty());
    }

    #[test]
    fn test_drop_cancels_pending() {
        let timer = ManualTimer::default();
        let (emitted, on_emit) = recorder(&timer);
        {
            let mut debouncer = Debouncer::new(timer.clone(), QUIET_PERIOD_MS, "", on_emit);
            debouncer.input("pasta");
        }
        timer.advance_to(10_000);
        assert!(emitted.borrow().is_empty());
    }
}
