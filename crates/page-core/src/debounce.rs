//! Trailing-edge debounce

use std::cell::Cell;
use std::rc::Rc;

use crate::scheduler::{Scheduler, TimerId};

/// Collapses bursts of calls into one trailing call.
///
/// Each [`call`](Debouncer::call) cancels the pending timer and schedules a
/// fresh one `wait_ms` later carrying the newest arguments, so only the last
/// call of a quiet period reaches the callback.
pub struct Debouncer<A> {
    scheduler: Rc<dyn Scheduler>,
    wait_ms: u32,
    callback: Rc<dyn Fn(A)>,
    pending: Rc<Cell<Option<TimerId>>>,
}

impl<A: 'static> Debouncer<A> {
    pub fn new<F>(scheduler: Rc<dyn Scheduler>, wait_ms: u32, callback: F) -> Self
    where
        F: Fn(A) + 'static,
    {
        Self {
            scheduler,
            wait_ms,
            callback: Rc::new(callback),
            pending: Rc::new(Cell::new(None)),
        }
    }

    pub fn call(&self, args: A) {
        if let Some(id) = self.pending.take() {
            self.scheduler.clear_timeout(id);
        }

        let callback = Rc::clone(&self.callback);
        let pending = Rc::clone(&self.pending);
        let id = self.scheduler.set_timeout(
            self.wait_ms,
            Box::new(move || {
                pending.set(None);
                callback(args);
            }),
        );
        self.pending.set(Some(id));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get().is_some()
    }

    pub fn wait_ms(&self) -> u32 {
        self.wait_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ManualScheduler;
    use std::cell::RefCell;

    fn recorder() -> (Rc<RefCell<Vec<(u64, u32)>>>, Rc<ManualScheduler>) {
        (Rc::new(RefCell::new(Vec::new())), Rc::new(ManualScheduler::new()))
    }

    #[test]
    fn test_burst_collapses_to_last_call() {
        let (calls, clock) = recorder();
        let seen = calls.clone();
        let time = clock.clone();
        let debounced = Debouncer::new(clock.clone(), 500, move |n: u32| {
            seen.borrow_mut().push((time.now_ms(), n));
        });

        debounced.call(1);
        clock.advance(100);
        debounced.call(2);
        clock.advance(100);
        debounced.call(3);

        clock.advance(499);
        assert!(calls.borrow().is_empty());
        assert!(debounced.is_pending());

        clock.advance(1);
        assert_eq!(*calls.borrow(), vec![(700, 3)]);
        assert!(!debounced.is_pending());

        clock.advance(5_000);
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn test_separate_quiet_periods_each_fire() {
        let (calls, clock) = recorder();
        let seen = calls.clone();
        let debounced = Debouncer::new(clock.clone(), 250, move |n: u32| {
            seen.borrow_mut().push((0, n));
        });

        debounced.call(1);
        clock.advance(300);
        debounced.call(2);
        clock.advance(300);

        let values: Vec<u32> = calls.borrow().iter().map(|(_, n)| *n).collect();
        assert_eq!(values, vec![1, 2]);
        assert_eq!(clock.pending_count(), 0);
    }
}
