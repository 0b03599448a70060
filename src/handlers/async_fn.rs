//! # Function-backed asynchronous handler.
//!
//! `call` on an [`AsyncFnHandler`] never executes the function inline: it
//! clones the value, packages `(function, value)` as a pool job through the
//! handler's [`ProcessList`], and returns as soon as submission succeeds —
//! bounded time, independent of how long the function takes. On the worker
//! thread the handler's [`SharedLock`] is held exactly for the duration of
//! the function body.
//!
//! Each handler gets a fresh lock from the runtime's lock pool unless one is
//! installed explicitly — handlers that should serialize against each other
//! share one [`SharedLock`] via [`set_shared_lock`].
//!
//! [`SharedLock`]: crate::SharedLock
//! [`set_shared_lock`]: AsyncFnHandler::set_shared_lock

use std::sync::Arc;

use parking_lot::Mutex;

use crate::locks::SharedLock;
use crate::observer::Anchor;
use crate::pool::DEFAULT_PRIORITY;
use crate::runtime::Runtime;

use super::handler::Handler;
use super::process_list::ProcessList;

type BoxedFn<D> = Box<dyn FnMut(&D) + Send>;

/// Handler that routes every call through the runtime's thread pool.
pub struct AsyncFnHandler<D> {
    func: Arc<Mutex<BoxedFn<D>>>,
    submissions: ProcessList,
    runtime: Arc<Runtime>,
    task_type: usize,
    priority: u32,
    anchor: Anchor<dyn Handler<D>>,
}

impl<D: Clone + Send + 'static> AsyncFnHandler<D> {
    /// Creates a handler targeting task type 0 at the default priority, with
    /// a fresh shared lock minted from the runtime's lock pool.
    pub fn new(runtime: Arc<Runtime>, func: impl FnMut(&D) + Send + 'static) -> Self {
        let lock = runtime.lock_pool().mint();
        Self {
            func: Arc::new(Mutex::new(Box::new(func))),
            submissions: ProcessList::new(lock),
            runtime,
            task_type: 0,
            priority: DEFAULT_PRIORITY,
            anchor: Anchor::new(),
        }
    }

    /// Shorthand for `Arc::new(Self::new(runtime, func))`, ready to attach.
    pub fn arc(runtime: Arc<Runtime>, func: impl FnMut(&D) + Send + 'static) -> Arc<Self> {
        Arc::new(Self::new(runtime, func))
    }

    /// Routes subsequent calls to `task_type` at `priority`.
    ///
    /// The task type is validated at call time against the runtime's active
    /// configuration, not here.
    #[must_use]
    pub fn route_to(mut self, task_type: usize, priority: u32) -> Self {
        self.task_type = task_type;
        self.priority = priority;
        self
    }

    /// Replaces the handler's function.
    ///
    /// Blocks while a previously submitted call is executing the current
    /// function on a worker.
    pub fn set_func(&self, func: impl FnMut(&D) + Send + 'static) {
        *self.func.lock() = Box::new(func);
    }

    /// Installs the shared lock wrapped around subsequent function bodies.
    pub fn set_shared_lock(&self, lock: SharedLock) {
        self.submissions.set_shared_lock(lock);
    }

    /// A handle to the current shared lock.
    pub fn shared_lock(&self) -> SharedLock {
        self.submissions.shared_lock()
    }

    /// Waits for every in-flight call to finish executing.
    pub fn drain(&self) {
        self.submissions.drain();
    }

    /// Number of tracked in-flight calls.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.submissions.pending()
    }

    /// Detaches from the current handler list, if attached. Idempotent.
    pub fn detach(&self) -> bool {
        self.anchor.detach()
    }

    /// `true` while attached to some handler list.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.anchor.is_attached()
    }
}

impl<D: Clone + Send + 'static> Handler<D> for AsyncFnHandler<D> {
    /// Packages the call and submits it; does not wait for execution.
    ///
    /// # Panics
    /// Panics if the handler's task type does not exist in the runtime's
    /// active configuration — routing to a lane that was never configured is
    /// caller misuse, not a runtime condition.
    fn call(&self, data: &D) {
        let data = data.clone();
        let func = Arc::clone(&self.func);
        let submitted = self.submissions.exec(
            &self.runtime,
            self.task_type,
            self.priority,
            move || {
                let mut func = func.lock();
                (*func)(&data);
            },
        );
        if let Err(err) = submitted {
            panic!("async handler submission failed: {err}");
        }
    }

    fn anchor(&self) -> &Anchor<dyn Handler<D>> {
        &self.anchor
    }
}

impl<D> std::fmt::Debug for AsyncFnHandler<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncFnHandler")
            .field("task_type", &self.task_type)
            .field("priority", &self.priority)
            .field("attached", &self.anchor.is_attached())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::thread;
    use std::time::{Duration, Instant};

    use crate::handlers::HandlerList;

    use super::*;

    #[test]
    fn test_call_submits_and_returns_before_execution_finishes() {
        let runtime = Runtime::new();
        let hits = Arc::new(AtomicU32::new(0));
        let hits2 = Arc::clone(&hits);

        let handler = AsyncFnHandler::arc(Arc::clone(&runtime), move |v: &u32| {
            thread::sleep(Duration::from_millis(300));
            hits2.fetch_add(*v, Ordering::SeqCst);
        });

        let started = Instant::now();
        handler.call(&7);
        assert!(
            started.elapsed() < Duration::from_millis(200),
            "call must return without waiting for the function"
        );

        handler.drain();
        assert_eq!(hits.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn test_calls_through_list_reach_worker() {
        let runtime = Runtime::new();
        let list: HandlerList<u32> = HandlerList::new();
        let hits = Arc::new(AtomicU32::new(0));
        let hits2 = Arc::clone(&hits);

        let handler = AsyncFnHandler::arc(Arc::clone(&runtime), move |v: &u32| {
            hits2.fetch_add(*v, Ordering::SeqCst);
        });
        list.attach(&handler);

        for _ in 0..10 {
            list.call(&1);
        }
        handler.drain();
        assert_eq!(hits.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn test_shared_handle_serializes_two_handlers() {
        let runtime = Runtime::new();
        let lock = SharedLock::new();

        let overlap = Arc::new(AtomicU32::new(0));
        let busy = Arc::new(AtomicU32::new(0));

        let make = |runtime: &Arc<Runtime>| {
            let overlap = Arc::clone(&overlap);
            let busy = Arc::clone(&busy);
            AsyncFnHandler::arc(Arc::clone(runtime), move |_: &u32| {
                if busy.fetch_add(1, Ordering::SeqCst) > 0 {
                    overlap.fetch_add(1, Ordering::SeqCst);
                }
                thread::sleep(Duration::from_millis(5));
                busy.fetch_sub(1, Ordering::SeqCst);
            })
        };

        let a = make(&runtime);
        let b = make(&runtime);
        a.set_shared_lock(lock.clone());
        b.set_shared_lock(lock.clone());

        for _ in 0..10 {
            a.call(&0);
            b.call(&0);
        }
        a.drain();
        b.drain();

        assert_eq!(
            overlap.load(Ordering::SeqCst),
            0,
            "bodies sharing one lock must never overlap"
        );
    }

    #[test]
    #[should_panic(expected = "async handler submission failed")]
    fn test_unconfigured_task_type_panics_on_call() {
        let runtime = Runtime::new();
        let handler = AsyncFnHandler::new(runtime, |_: &u32| {}).route_to(5, 50);
        handler.call(&1);
    }
}
