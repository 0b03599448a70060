//! # Publisher side of the subscriber/publisher pair.
//!
//! A [`Publisher`] owns the attach list its subscribers occupy. Entries are
//! weak references — subscriber lifetime stays with whoever owns the
//! subscriber's `Arc`, and an entry whose subscriber has died is skipped on
//! traversal and removed by the subscriber's own [`Anchor`] drop.
//!
//! ## Fan-out policy
//! [`for_each`](Publisher::for_each) snapshots the entries in attachment order
//! under the list lock, then invokes the callback after the lock is released.
//! A subscriber may therefore detach itself — including by being dropped —
//! while it is being visited; subscribers attached after the snapshot was taken
//! are not visited by that traversal.

use std::sync::Arc;

use crate::list::Position;

use super::anchor::{Anchor, SubscriberEntries};

/// Contract for objects that can occupy a seat in a [`Publisher`] of `S`.
///
/// `S` is the subscriber type the publisher stores — typically a trait object,
/// in which case the trait itself exposes the anchor and this impl is a
/// one-line forward.
pub trait Subscriber<S: ?Sized>: Send + Sync {
    /// The anchor recording where this subscriber is attached.
    fn anchor(&self) -> &Anchor<S>;
}

/// Owner of a subscriber list with attach and bulk-traversal operations.
pub struct Publisher<S: ?Sized> {
    list: Arc<SubscriberEntries<S>>,
}

impl<S: ?Sized + Send + Sync + 'static> Publisher<S> {
    /// Creates a publisher with no subscribers.
    pub fn new() -> Self {
        Self {
            list: Arc::new(SubscriberEntries::new()),
        }
    }

    /// Attaches `sub` at the back of this publisher's list.
    ///
    /// If `sub` is currently attached anywhere (here or to another publisher),
    /// it is detached first — a subscriber occupies at most one list at a time.
    pub fn attach(&self, sub: &Arc<S>) -> Position
    where
        S: Subscriber<S>,
    {
        sub.anchor().attach_to(&self.list, Arc::downgrade(sub))
    }

    /// Attaches `sub` immediately before the element at `before`.
    ///
    /// # Panics
    /// Panics if `before` is stale or foreign, like
    /// [`AttachList::insert_before`](crate::AttachList::insert_before).
    pub fn attach_before(&self, before: Position, sub: &Arc<S>) -> Position
    where
        S: Subscriber<S>,
    {
        sub.anchor()
            .attach_before(&self.list, before, Arc::downgrade(sub))
    }

    /// Visits every live subscriber in attachment order.
    ///
    /// Operates on a snapshot; see the [module docs](self) for the exact
    /// semantics under concurrent attach/detach.
    pub fn for_each(&self, mut f: impl FnMut(&Arc<S>)) {
        let mut snapshot = Vec::new();
        self.list.map(|entry| snapshot.push(entry.clone()));
        for entry in snapshot {
            if let Some(sub) = entry.upgrade() {
                f(&sub);
            }
        }
    }

    /// Number of entries currently in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// `true` if no subscriber is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// The underlying entry list, for position-based removal by wrappers.
    pub(crate) fn entries(&self) -> &Arc<SubscriberEntries<S>> {
        &self.list
    }
}

impl<S: ?Sized + Send + Sync + 'static> Default for Publisher<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ?Sized> std::fmt::Debug for Publisher<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Publisher")
            .field("len", &self.list.len())
            .finish()
    }
}
