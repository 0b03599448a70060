//! # Bus containers: shared registries of handler lists.
//!
//! A bus container maps an index space onto [`HandlerList`]s so unrelated
//! parts of a program can rendezvous on a channel number or key instead of
//! passing list references around. [`BusTable`] is the dense, slot-indexed
//! variant; [`BusMap`] the keyed variant. Both hand out `Arc`s to the
//! registered lists, so a list stays usable even after being taken out of the
//! bus.
//!
//! All registration misuse (out-of-range slot, occupied slot, empty slot,
//! unknown key) is reported as a typed [`DispatchError`].

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::DispatchError;
use crate::handlers::{Handler, HandlerList};
use crate::list::Position;

/// Dense, slot-indexed registry of handler lists.
pub struct BusTable<D> {
    slots: RwLock<Vec<Option<Arc<HandlerList<D>>>>>,
}

impl<D: 'static> BusTable<D> {
    /// Creates a table with no slots; grow it with
    /// [`set_slot_count`](Self::set_slot_count) or [`push`](Self::push).
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(Vec::new()),
        }
    }

    /// Creates a table with `count` empty slots.
    pub fn with_slots(count: usize) -> Self {
        let table = Self::new();
        table.set_slot_count(count);
        table
    }

    /// Grows or shrinks the slot space. Shrinking drops the surplus slots and
    /// whatever lists they held.
    pub fn set_slot_count(&self, count: usize) {
        self.slots.write().resize_with(count, || None);
    }

    /// Number of slots.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.read().len()
    }

    /// Appends `list` in a fresh slot and returns the slot index.
    pub fn push(&self, list: Arc<HandlerList<D>>) -> usize {
        let mut slots = self.slots.write();
        slots.push(Some(list));
        slots.len() - 1
    }

    /// Registers `list` in the empty slot `index`.
    pub fn register(&self, index: usize, list: Arc<HandlerList<D>>) -> Result<(), DispatchError> {
        let mut slots = self.slots.write();
        let count = slots.len();
        match slots.get_mut(index) {
            Some(slot) if slot.is_none() => {
                *slot = Some(list);
                Ok(())
            }
            Some(_) => Err(DispatchError::SlotOccupied { index }),
            None => Err(DispatchError::SlotOutOfRange { index, count }),
        }
    }

    /// Removes and returns the list in slot `index`, leaving the slot empty.
    pub fn take(&self, index: usize) -> Result<Arc<HandlerList<D>>, DispatchError> {
        let mut slots = self.slots.write();
        let count = slots.len();
        match slots.get_mut(index) {
            Some(slot) => slot.take().ok_or(DispatchError::SlotEmpty { index }),
            None => Err(DispatchError::SlotOutOfRange { index, count }),
        }
    }

    /// The list in slot `index`.
    pub fn get(&self, index: usize) -> Result<Arc<HandlerList<D>>, DispatchError> {
        let slots = self.slots.read();
        let count = slots.len();
        match slots.get(index) {
            Some(Some(list)) => Ok(Arc::clone(list)),
            Some(None) => Err(DispatchError::SlotEmpty { index }),
            None => Err(DispatchError::SlotOutOfRange { index, count }),
        }
    }

    /// Attaches `handler` to the list in slot `index`.
    pub fn attach<H>(&self, index: usize, handler: &Arc<H>) -> Result<Position, DispatchError>
    where
        H: Handler<D> + 'static,
    {
        Ok(self.get(index)?.attach(handler))
    }

    /// Delivers `data` to every handler of the list in slot `index`.
    pub fn call(&self, index: usize, data: &D) -> Result<(), DispatchError> {
        self.get(index)?.call(data);
        Ok(())
    }
}

impl<D: 'static> Default for BusTable<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> std::fmt::Debug for BusTable<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BusTable")
            .field("slots", &self.slots.read().len())
            .finish()
    }
}

/// Keyed registry of handler lists.
pub struct BusMap<K, D> {
    entries: RwLock<HashMap<K, Arc<HandlerList<D>>>>,
}

impl<K: Eq + Hash, D: 'static> BusMap<K, D> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Registers `list` under `key`, returning the previous occupant if any.
    pub fn insert(&self, key: K, list: Arc<HandlerList<D>>) -> Option<Arc<HandlerList<D>>> {
        self.entries.write().insert(key, list)
    }

    /// Removes and returns the list registered under `key`.
    pub fn remove(&self, key: &K) -> Option<Arc<HandlerList<D>>> {
        self.entries.write().remove(key)
    }

    /// The list registered under `key`.
    pub fn get(&self, key: &K) -> Result<Arc<HandlerList<D>>, DispatchError> {
        self.entries
            .read()
            .get(key)
            .cloned()
            .ok_or(DispatchError::UnknownKey)
    }

    /// Attaches `handler` to the list registered under `key`.
    pub fn attach<H>(&self, key: &K, handler: &Arc<H>) -> Result<Position, DispatchError>
    where
        H: Handler<D> + 'static,
    {
        Ok(self.get(key)?.attach(handler))
    }

    /// Delivers `data` to every handler of the list registered under `key`.
    pub fn call(&self, key: &K, data: &D) -> Result<(), DispatchError> {
        self.get(key)?.call(data);
        Ok(())
    }

    /// Number of registered keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl<K: Eq + Hash, D: 'static> Default for BusMap<K, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, D> std::fmt::Debug for BusMap<K, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BusMap")
            .field("len", &self.entries.read().len())
            .finish()
    }
}
