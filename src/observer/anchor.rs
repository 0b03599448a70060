//! # Single-seat back-reference from a subscriber to its publisher.
//!
//! Every subscriber embeds an [`Anchor`]: at most one `(list, position)` pair
//! recording where the subscriber is currently attached. The reference to the
//! list is weak — an anchor never keeps its publisher alive, and a publisher
//! never keeps its subscribers alive, so the two sides can be destroyed in any
//! order without dangling entries.
//!
//! ## Guarantees
//! - `detach()` is idempotent: detaching an unattached anchor is a no-op.
//! - Attaching somewhere new detaches from the previous seat first, so a
//!   subscriber is a member of at most one list at a time.
//! - Dropping an anchor (i.e. dropping the subscriber that embeds it) detaches.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::list::{AttachList, Position};

/// The entries a publisher list stores for subscribers of type `S`.
pub(crate) type SubscriberEntries<S: ?Sized> = AttachList<Weak<S>>;

struct Seat<S: ?Sized> {
    list: Weak<SubscriberEntries<S>>,
    pos: Position,
}

/// Single-seat, weak back-reference to the list a subscriber is attached to.
///
/// `S` is the (usually trait-object) subscriber type the publisher stores.
pub struct Anchor<S: ?Sized> {
    seat: Mutex<Option<Seat<S>>>,
}

impl<S: ?Sized> Anchor<S> {
    /// Creates a detached anchor.
    pub fn new() -> Self {
        Self {
            seat: Mutex::new(None),
        }
    }

    /// Returns `true` while the anchor occupies a seat in a live publisher
    /// list. A seat whose list has been dropped no longer counts as attached.
    pub fn is_attached(&self) -> bool {
        self.seat
            .lock()
            .as_ref()
            .is_some_and(|seat| seat.list.strong_count() > 0)
    }

    /// Vacates the current seat, if any.
    ///
    /// Returns `true` if an entry was actually removed from a live list.
    /// Idempotent: a detached anchor (or one whose publisher has already been
    /// dropped) is left unchanged.
    pub fn detach(&self) -> bool {
        let seat = self.seat.lock().take();
        match seat {
            Some(seat) => match seat.list.upgrade() {
                Some(list) => list.remove(seat.pos).is_some(),
                None => false,
            },
            None => false,
        }
    }

    /// Occupies a seat at the back of `list`, vacating any previous seat first.
    pub(crate) fn attach_to(&self, list: &Arc<SubscriberEntries<S>>, entry: Weak<S>) -> Position {
        let mut seat = self.seat.lock();
        Self::vacate(&mut seat);
        let pos = list.push_back(entry);
        *seat = Some(Seat {
            list: Arc::downgrade(list),
            pos,
        });
        pos
    }

    /// Occupies a seat immediately before `before`, vacating any previous seat
    /// first. Panics if `before` is stale, like
    /// [`AttachList::insert_before`](crate::AttachList::insert_before).
    pub(crate) fn attach_before(
        &self,
        list: &Arc<SubscriberEntries<S>>,
        before: Position,
        entry: Weak<S>,
    ) -> Position {
        let mut seat = self.seat.lock();
        Self::vacate(&mut seat);
        let pos = list.insert_before(before, entry);
        *seat = Some(Seat {
            list: Arc::downgrade(list),
            pos,
        });
        pos
    }

    /// Forgets the seat without touching the list, but only if the seat still
    /// refers to `(list, pos)`. Used when the entry was already removed through
    /// the list side (position-based detach).
    pub(crate) fn clear_if(&self, list: &Arc<SubscriberEntries<S>>, pos: Position) {
        let mut seat = self.seat.lock();
        if let Some(current) = seat.as_ref() {
            if current.pos == pos && current.list.as_ptr() == Arc::as_ptr(list) {
                *seat = None;
            }
        }
    }

    fn vacate(seat: &mut Option<Seat<S>>) {
        if let Some(old) = seat.take() {
            if let Some(list) = old.list.upgrade() {
                list.remove(old.pos);
            }
        }
    }
}

impl<S: ?Sized> Default for Anchor<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ?Sized> Drop for Anchor<S> {
    fn drop(&mut self) {
        self.detach();
    }
}

impl<S: ?Sized> std::fmt::Debug for Anchor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Anchor")
            .field("attached", &self.is_attached())
            .finish()
    }
}
