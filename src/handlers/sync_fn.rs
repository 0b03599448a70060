//! Function-backed synchronous handler.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::locks::SharedLock;
use crate::observer::Anchor;

use super::handler::Handler;

type BoxedFn<D> = Box<dyn FnMut(&D) + Send>;

/// Handler that executes its function inline on the caller's thread.
///
/// A private mutex serializes [`call`](Handler::call) against
/// [`set_func`](SyncFnHandler::set_func): replacing the function while another
/// thread is inside `call` blocks until that call completes.
///
/// With a [`SharedLock`] installed, the lock is additionally acquired around
/// the function body, so any set of handlers holding copies of the same handle
/// are mutually excluded without knowing about each other.
pub struct SyncFnHandler<D> {
    func: Mutex<BoxedFn<D>>,
    shared: Mutex<Option<SharedLock>>,
    anchor: Anchor<dyn Handler<D>>,
}

impl<D: 'static> SyncFnHandler<D> {
    /// Creates a handler with no shared lock.
    pub fn new(func: impl FnMut(&D) + Send + 'static) -> Self {
        Self {
            func: Mutex::new(Box::new(func)),
            shared: Mutex::new(None),
            anchor: Anchor::new(),
        }
    }

    /// Creates a handler that wraps its function body in `lock`.
    pub fn with_lock(func: impl FnMut(&D) + Send + 'static, lock: SharedLock) -> Self {
        Self {
            func: Mutex::new(Box::new(func)),
            shared: Mutex::new(Some(lock)),
            anchor: Anchor::new(),
        }
    }

    /// Shorthand for `Arc::new(Self::new(func))`, ready to attach.
    pub fn arc(func: impl FnMut(&D) + Send + 'static) -> Arc<Self> {
        Arc::new(Self::new(func))
    }

    /// Replaces the handler's function.
    ///
    /// Blocks while a `call` is executing the current function.
    pub fn set_func(&self, func: impl FnMut(&D) + Send + 'static) {
        *self.func.lock() = Box::new(func);
    }

    /// Installs or removes the shared lock used around the function body.
    pub fn set_shared_lock(&self, lock: Option<SharedLock>) {
        *self.shared.lock() = lock;
    }

    /// The currently installed shared lock, if any.
    pub fn shared_lock(&self) -> Option<SharedLock> {
        self.shared.lock().clone()
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

impl<D: 'static> Handler<D> for SyncFnHandler<D> {
    fn call(&self, data: &D) {
        let shared = self.shared.lock().clone();
        let _excluded = shared.as_ref().map(|lock| lock.lock());
        let mut func = self.func.lock();
        (*func)(data);
    }

    fn anchor(&self) -> &Anchor<dyn Handler<D>> {
        &self.anchor
    }
}

impl<D> std::fmt::Debug for SyncFnHandler<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncFnHandler")
            .field("attached", &self.anchor.is_attached())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use crate::handlers::HandlerList;

    use super::*;

    #[test]
    fn test_call_executes_inline() {
        let hits = Arc::new(AtomicU32::new(0));
        let hits2 = Arc::clone(&hits);
        let handler = SyncFnHandler::arc(move |v: &u32| {
            hits2.fetch_add(*v, Ordering::SeqCst);
        });

        handler.call(&5);
        assert_eq!(hits.load(Ordering::SeqCst), 5, "call must run synchronously");
    }

    #[test]
    fn test_set_func_replaces_behavior() {
        let hits = Arc::new(AtomicU32::new(0));
        let handler = SyncFnHandler::arc(|_: &u32| {});

        let hits2 = Arc::clone(&hits);
        handler.set_func(move |v: &u32| {
            hits2.fetch_add(*v, Ordering::SeqCst);
        });
        handler.call(&3);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_detach_and_reattach() {
        let list: HandlerList<u32> = HandlerList::new();
        let handler = SyncFnHandler::arc(|_: &u32| {});

        list.attach(&handler);
        assert!(handler.is_attached());

        assert!(handler.detach());
        assert!(!handler.detach(), "second detach is a no-op");
        assert!(list.is_empty());

        list.attach(&handler);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_handlers_sharing_one_lock_never_overlap() {
        let lock = SharedLock::new();
        let busy = Arc::new(AtomicU32::new(0));
        let overlap = Arc::new(AtomicU32::new(0));

        let make = || {
            let busy = Arc::clone(&busy);
            let overlap = Arc::clone(&overlap);
            Arc::new(SyncFnHandler::with_lock(
                move |_: &u32| {
                    if busy.fetch_add(1, Ordering::SeqCst) > 0 {
                        overlap.fetch_add(1, Ordering::SeqCst);
                    }
                    std::thread::sleep(std::time::Duration::from_millis(2));
                    busy.fetch_sub(1, Ordering::SeqCst);
                },
                lock.clone(),
            ))
        };
        let a = make();
        let b = make();

        let caller_a = {
            let a = Arc::clone(&a);
            std::thread::spawn(move || {
                for _ in 0..20 {
                    a.call(&0);
                }
            })
        };
        let caller_b = {
            let b = Arc::clone(&b);
            std::thread::spawn(move || {
                for _ in 0..20 {
                    b.call(&0);
                }
            })
        };
        caller_a.join().unwrap();
        caller_b.join().unwrap();

        assert_eq!(
            overlap.load(Ordering::SeqCst),
            0,
            "bodies guarded by one shared handle must be mutually exclusive"
        );
    }

    #[test]
    fn test_shared_lock_roundtrip() {
        let handler = SyncFnHandler::new(|_: &u32| {});
        assert!(handler.shared_lock().is_none());

        let lock = SharedLock::new();
        handler.set_shared_lock(Some(lock.clone()));
        assert!(handler.shared_lock().unwrap().same_lock(&lock));

        handler.set_shared_lock(None);
        assert!(handler.shared_lock().is_none());
    }
}
