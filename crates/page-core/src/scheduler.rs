//! Timer capability

/// Handle returned by [`Scheduler::set_timeout`]
pub type TimerId = i32;

/// One-shot timers on the page's event loop
pub trait Scheduler {
    /// Run `task` once after `delay_ms`
    fn set_timeout(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TimerId;

    /// Cancel a pending timer; unknown or already-fired ids are ignored
    fn clear_timeout(&self, id: TimerId);
}
