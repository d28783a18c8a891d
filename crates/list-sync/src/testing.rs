//! Test helpers shared across modules

use std::cell::RefCell;
use std::rc::Rc;

use crate::debounce::Timer;

type Callback = Box<dyn FnOnce()>;

#[derive(Default)]
struct Clock {
    now: u64,
    next_id: u64,
    queue: Vec<(u64, u64, Callback)>,
}

/// Virtual clock, advanced by hand
#[derive(Clone, Default)]
pub(crate) struct ManualTimer {
    clock: Rc<RefCell<Clock>>,
}

impl ManualTimer {
    pub(crate) fn now(&self) -> u64 {
        self.clock.borrow().now
    }

    pub(crate) fn scheduled(&self) -> usize {
        self.clock.borrow().queue.len()
    }

    /// Fire every callback due by `target`, in due order
    pub(crate) fn advance_to(&self, target: u64) {
        loop {
            let next = {
                let mut clock = self.clock.borrow_mut();
                let due = clock
                    .queue
                    .iter()
                    .enumerate()
                    .filter(|(_, (at, _, _))| *at <= target)
                    .min_by_key(|(_, (at, id, _))| (*at, *id))
                    .map(|(index, _)| index);
                due.map(|index| {
                    let (at, _, callback) = clock.queue.remove(index);
                    clock.now = at;
                    callback
                })
            };
            match next {
                Some(callback) => callback(),
                None => break,
            }
        }
        self.clock.borrow_mut().now = target;
    }
}

impl Timer for ManualTimer {
    type Handle = u64;

    fn start(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> u64 {
        let mut clock = self.clock.borrow_mut();
        clock.next_id += 1;
        let id = clock.next_id;
        let at = clock.now + u64::from(delay_ms);
        clock.queue.push((at, id, callback));
        id
    }

    fn cancel(&self, handle: u64) {
        self.clock.borrow_mut().queue.retain(|(_, id, _)| *id != handle);
    }
}
