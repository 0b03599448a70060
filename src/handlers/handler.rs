//! # Handler trait and the typed handler list.
//!
//! A [`Handler`] is a subscriber specialized to receive one call of type `D`.
//! Handlers live in [`HandlerList`]s; producers push values into a list's
//! [`call`](HandlerList::call) path and every attached handler receives the
//! value, in attachment order.
//!
//! Handlers are shared as `Arc`s and the attaching code keeps the `Arc`: the
//! list holds only a weak entry, so dropping the owner's `Arc` both detaches
//! the handler and releases it. Explicit [`Anchor::detach`] (or
//! position-based [`HandlerList::detach`]) removes without releasing.
//!
//! [`Anchor::detach`]: crate::Anchor::detach

use std::sync::Arc;

use crate::list::Position;
use crate::observer::{Anchor, Publisher, Subscriber};

/// A subscriber that receives typed values via [`call`](Handler::call).
pub trait Handler<D>: Send + Sync {
    /// Delivers one value to this handler.
    ///
    /// Synchronous handlers execute on the caller's thread before returning;
    /// asynchronous handlers only package and submit the work.
    fn call(&self, data: &D);

    /// The anchor recording which handler list this handler occupies.
    fn anchor(&self) -> &Anchor<dyn Handler<D>>;
}

impl<D: 'static> Subscriber<dyn Handler<D>> for dyn Handler<D> {
    fn anchor(&self) -> &Anchor<dyn Handler<D>> {
        Handler::anchor(self)
    }
}

/// Publisher of handlers for values of type `D`.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use eventloom::{HandlerList, SyncFnHandler};
///
/// let list: HandlerList<u32> = HandlerList::new();
/// let sum = Arc::new(AtomicU32::new(0));
/// let sum2 = Arc::clone(&sum);
///
/// let handler = SyncFnHandler::arc(move |v: &u32| {
///     sum2.fetch_add(*v, Ordering::SeqCst);
/// });
/// list.attach(&handler);
///
/// list.call(&21);
/// list.call(&21);
/// assert_eq!(sum.load(Ordering::SeqCst), 42);
/// ```
pub struct HandlerList<D> {
    inner: Publisher<dyn Handler<D>>,
}

impl<D: 'static> HandlerList<D> {
    /// Creates a list with no handlers.
    pub fn new() -> Self {
        Self {
            inner: Publisher::new(),
        }
    }

    /// Attaches a handler at the back of the list, detaching it from any list
    /// it currently occupies.
    pub fn attach<H>(&self, handler: &Arc<H>) -> Position
    where
        H: Handler<D> + 'static,
    {
        let entry: Arc<dyn Handler<D>> = Arc::clone(handler);
        self.inner.attach(&entry)
    }

    /// Attaches a handler immediately before the element at `before`.
    ///
    /// # Panics
    /// Panics if `before` is stale or foreign.
    pub fn attach_before<H>(&self, before: Position, handler: &Arc<H>) -> Position
    where
        H: Handler<D> + 'static,
    {
        let entry: Arc<dyn Handler<D>> = Arc::clone(handler);
        self.inner.attach_before(before, &entry)
    }

    /// Removes the handler at `pos` from the list and clears its anchor.
    ///
    /// The handler itself stays alive (its owner still holds the `Arc`) and
    /// can be re-attached. Returns `false` if `pos` was already stale.
    pub fn detach(&self, pos: Position) -> bool {
        match self.inner.entries().remove(pos) {
            Some(entry) => {
                if let Some(handler) = entry.upgrade() {
                    Handler::anchor(&*handler).clear_if(self.inner.entries(), pos);
                }
                true
            }
            None => false,
        }
    }

    /// Delivers `data` to every attached handler, in attachment order.
    ///
    /// Synchronous handlers have all executed by the time this returns.
    /// Handlers attached while the fan-out is in progress are not included.
    pub fn call(&self, data: &D) {
        self.inner.for_each(|handler| handler.call(data));
    }

    /// Number of attached handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// `true` if no handler is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<D: 'static> Default for HandlerList<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> std::fmt::Debug for HandlerList<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerList").finish_non_exhaustive()
    }
}
