//! Defer Module - Deferred task queue.
//!
//! The engine's "next tick": work queued here runs after the current
//! synchronous dispatch returns, when the host loop calls [`flush`]. The
//! terminal bridge flushes automatically after routing each event.
//!
//! Paste distribution is the one user of this queue: it must not race the
//! dispatch that triggered it, and it must be a benign no-op if its target
//! segments were torn down before the tick runs (tasks verify their segment
//! handles against the registry, not the queue).
//!
//! Tasks queued while a flush is running land in the next tick.
//!
//! # Example
//!
//! ```ignore
//! use pinpad::state::defer;
//!
//! defer::defer(|| println!("runs on the next tick"));
//! assert_eq!(defer::pending(), 1);
//! defer::flush();
//! ```

use std::cell::RefCell;

thread_local! {
    static QUEUE: RefCell<Vec<Box<dyn FnOnce()>>> = RefCell::new(Vec::new());
}

/// Queue a task to run on the next flush.
pub fn defer<F>(task: F)
where
    F: FnOnce() + 'static,
{
    QUEUE.with(|queue| {
        queue.borrow_mut().push(Box::new(task));
    });
}

/// Run all tasks queued before this call. Returns the number of tasks run.
///
/// Tasks a running task queues are left for the next flush.
pub fn flush() -> usize {
    let tasks: Vec<Box<dyn FnOnce()>> = QUEUE.with(|queue| {
        std::mem::take(&mut *queue.borrow_mut())
    });

    let count = tasks.len();
    for task in tasks {
        task();
    }
    count
}

/// Number of tasks waiting for the next flush.
pub fn pending() -> usize {
    QUEUE.with(|queue| queue.borrow().len())
}

/// Drop all queued tasks without running them (for testing).
pub fn reset_defer_state() {
    QUEUE.with(|queue| queue.borrow_mut().clear());
}
