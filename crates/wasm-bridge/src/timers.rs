//! `setTimeout` as a [`Scheduler`]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use page_core::{Scheduler, TimerId};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

struct PendingTimer {
    fired: Rc<Cell<bool>>,
    _callback: Closure<dyn FnMut()>,
}

/// Keeps each timer's closure alive until it fires or is cleared
pub struct WindowScheduler {
    window: Window,
    timers: RefCell<HashMap<TimerId, PendingTimer>>,
}

impl WindowScheduler {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            timers: RefCell::new(HashMap::new()),
        }
    }

    /// A closure must not be dropped while it runs; fired timers are
    /// released on the next scheduling call instead.
    fn release_fired(&self) {
        self.timers
            .borrow_mut()
            .retain(|_, timer| !timer.fired.get());
    }
}

impl Scheduler for WindowScheduler {
    fn set_timeout(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TimerId {
        self.release_fired();

        let fired = Rc::new(Cell::new(false));
        let mut task = Some(task);
        let callback = {
            let fired = Rc::clone(&fired);
            Closure::<dyn FnMut()>::new(move || {
                if let Some(task) = task.take() {
                    task();
                }
                // Only after the task, which may schedule more timers
                fired.set(true);
            })
        };

        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                delay,
            ) {
            Ok(id) => {
                self.timers.borrow_mut().insert(
                    id,
                    PendingTimer {
                        fired,
                        _callback: callback,
                    },
                );
                id
            }
            Err(e) => {
                log::error!("setTimeout failed: {e:?}");
                // Never a valid handle, so clearing it is harmless
                0
            }
        }
    }

    fn clear_timeout(&self, id: TimerId) {
        self.window.clear_timeout_with_handle(id);
        self.timers.borrow_mut().remove(&id);
    }
}
