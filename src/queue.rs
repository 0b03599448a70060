//! # Event queue and a minimal event loop over it.
//!
//! [`EventQueue`] is a mutex-protected FIFO for handing batches of typed
//! events between threads; whole queues can be spliced in one operation.
//! [`EventLoop`] pairs a queue with a [`HandlerList`] so a consumer thread can
//! drain pending events through the dispatch chain at its own pace.

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::handlers::HandlerList;

/// Mutex-protected FIFO of typed events.
pub struct EventQueue<D> {
    inner: Mutex<VecDeque<D>>,
}

impl<D> EventQueue<D> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
        }
    }

    /// Appends an event.
    pub fn push(&self, event: D) {
        self.inner.lock().push_back(event);
    }

    /// Removes and returns the oldest event.
    pub fn poll(&self) -> Option<D> {
        self.inner.lock().pop_front()
    }

    /// Moves every event of `other` to the back of this queue, preserving
    /// order. `other` is left empty.
    ///
    /// Both locks are taken in address order, so two threads splicing in
    /// opposite directions cannot deadlock; splicing a queue into itself is a
    /// no-op.
    pub fn splice_from(&self, other: &EventQueue<D>) {
        if std::ptr::eq(self, other) {
            return;
        }
        let (first, second) = if (self as *const Self) < (other as *const Self) {
            (self, other)
        } else {
            (other, self)
        };
        let mut guard_a = first.inner.lock();
        let mut guard_b = second.inner.lock();
        let (dst, src) = if std::ptr::eq(first, self) {
            (&mut *guard_a, &mut *guard_b)
        } else {
            (&mut *guard_b, &mut *guard_a)
        };
        dst.append(src);
    }

    /// Number of queued events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// `true` if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Drops every queued event.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

impl<D> Default for EventQueue<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> std::fmt::Debug for EventQueue<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventQueue").field("len", &self.len()).finish()
    }
}

/// An event queue paired with the handler list that consumes it.
///
/// Producers [`push`](EventLoop::push) events (or batches via
/// [`load_from`](EventLoop::load_from)); the consuming thread calls
/// [`dispatch_pending`](EventLoop::dispatch_pending) to drain the queue
/// through the handler list.
pub struct EventLoop<D> {
    queue: EventQueue<D>,
    handlers: HandlerList<D>,
}

impl<D: 'static> EventLoop<D> {
    /// Creates an empty loop.
    pub fn new() -> Self {
        Self {
            queue: EventQueue::new(),
            handlers: HandlerList::new(),
        }
    }

    /// The handler list events are dispatched through.
    pub fn handlers(&self) -> &HandlerList<D> {
        &self.handlers
    }

    /// Queues one event for the next dispatch.
    pub fn push(&self, event: D) {
        self.queue.push(event);
    }

    /// Splices every pending event of `queue` into this loop.
    pub fn load_from(&self, queue: &EventQueue<D>) {
        self.queue.splice_from(queue);
    }

    /// Dispatches every queued event through the handler list, returning the
    /// number of events delivered. Events pushed while draining are included.
    pub fn dispatch_pending(&self) -> usize {
        let mut dispatched = 0;
        while let Some(event) = self.queue.poll() {
            self.handlers.call(&event);
            dispatched += 1;
        }
        dispatched
    }
}

impl<D: 'static> Default for EventLoop<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> std::fmt::Debug for EventLoop<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLoop")
            .field("pending", &self.queue.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use crate::handlers::attach_sync;

    use super::*;

    #[test]
    fn test_poll_is_fifo() {
        let queue: EventQueue<u32> = EventQueue::new();
        queue.push(1);
        queue.push(2);
        queue.push(3);

        assert_eq!(queue.poll(), Some(1));
        assert_eq!(queue.poll(), Some(2));
        assert_eq!(queue.poll(), Some(3));
        assert_eq!(queue.poll(), None);
    }

    #[test]
    fn test_splice_appends_and_empties_source() {
        let a: EventQueue<u32> = EventQueue::new();
        let b: EventQueue<u32> = EventQueue::new();
        a.push(1);
        b.push(2);
        b.push(3);

        a.splice_from(&b);
        assert!(b.is_empty());
        assert_eq!(a.poll(), Some(1));
        assert_eq!(a.poll(), Some(2));
        assert_eq!(a.poll(), Some(3));
    }

    #[test]
    fn test_event_loop_drains_through_handlers() {
        let event_loop: EventLoop<u32> = EventLoop::new();
        let sum = Arc::new(AtomicU32::new(0));
        let sum2 = Arc::clone(&sum);
        let _handler = attach_sync(event_loop.handlers(), move |v: &u32| {
            sum2.fetch_add(*v, Ordering::SeqCst);
        });

        let producer: EventQueue<u32> = EventQueue::new();
        producer.push(1);
        producer.push(2);
        event_loop.load_from(&producer);
        event_loop.push(3);

        assert_eq!(event_loop.dispatch_pending(), 3);
        assert_eq!(sum.load(Ordering::SeqCst), 6);
        assert_eq!(event_loop.dispatch_pending(), 0);
    }
}
