//! Transform-and-fan-out node in a dispatch chain.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::list::Position;
use crate::observer::Anchor;

use super::handler::{Handler, HandlerList};

type BoxedTransform<D, R> = Box<dyn FnMut(&D) -> R + Send>;

/// Handler of `D` that is also a publisher of handlers of `R`.
///
/// `call(data)` computes `transform(data)` and fans the result out to every
/// downstream handler, in attachment order, before returning. Downstream
/// attaches that happen while a fan-out is in progress catch the next call.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use eventloom::{HandlerList, Processor, SyncFnHandler};
///
/// let input: HandlerList<String> = HandlerList::new();
/// let lengths = Processor::arc(|s: &String| s.len());
/// input.attach(&lengths);
///
/// let total = Arc::new(AtomicUsize::new(0));
/// let total2 = Arc::clone(&total);
/// let sink = SyncFnHandler::arc(move |n: &usize| {
///     total2.fetch_add(*n, Ordering::SeqCst);
/// });
/// lengths.attach(&sink);
///
/// input.call(&"hello".to_string());
/// assert_eq!(total.load(Ordering::SeqCst), 5);
/// ```
pub struct Processor<D, R> {
    transform: Mutex<BoxedTransform<D, R>>,
    downstream: HandlerList<R>,
    anchor: Anchor<dyn Handler<D>>,
}

impl<D: 'static, R: 'static> Processor<D, R> {
    /// Creates a processor from its transform function.
    pub fn new(transform: impl FnMut(&D) -> R + Send + 'static) -> Self {
        Self {
            transform: Mutex::new(Box::new(transform)),
            downstream: HandlerList::new(),
            anchor: Anchor::new(),
        }
    }

    /// Shorthand for `Arc::new(Self::new(transform))`, ready to attach.
    pub fn arc(transform: impl FnMut(&D) -> R + Send + 'static) -> Arc<Self> {
        Arc::new(Self::new(transform))
    }

    /// Replaces the transform. Blocks while a `call` is executing it.
    pub fn set_transform(&self, transform: impl FnMut(&D) -> R + Send + 'static) {
        *self.transform.lock() = Box::new(transform);
    }

    /// Attaches a downstream handler for transformed values.
    pub fn attach<H>(&self, handler: &Arc<H>) -> Position
    where
        H: Handler<R> + 'static,
    {
        self.downstream.attach(handler)
    }

    /// The downstream handler list, for detach and bulk operations.
    pub fn downstream(&self) -> &HandlerList<R> {
        &self.downstream
    }

    /// Detaches from the current upstream list, if attached. Idempotent.
    pub fn detach(&self) -> bool {
        self.anchor.detach()
    }

    /// `true` while attached to some upstream handler list.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.anchor.is_attached()
    }
}

impl<D: 'static, R: 'static> Handler<D> for Processor<D, R> {
    fn call(&self, data: &D) {
        let result = {
            let mut transform = self.transform.lock();
            (*transform)(data)
        };
        self.downstream.call(&result);
    }

    fn anchor(&self) -> &Anchor<dyn Handler<D>> {
        &self.anchor
    }
}

impl<D, R> std::fmt::Debug for Processor<D, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Processor")
            .field("downstream", &self.downstream.len())
            .finish()
    }
}
