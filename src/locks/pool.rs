//! Mint-on-demand source of [`SharedLock`] handles.
//!
//! The pool keeps only weak references to the mutexes it has minted, so it
//! never extends a lock's lifetime: a minted lock lives exactly as long as the
//! handles held by its users. One `LockPool` lives inside the
//! [`Runtime`](crate::Runtime) and serves as the default handle source for
//! asynchronous handlers that were not given a lock explicitly.

use std::sync::{Arc, Weak};

use parking_lot::{Mutex, ReentrantMutex};

use super::shared::SharedLock;

/// Mints fresh [`SharedLock`] handles and tracks which are still alive.
pub struct LockPool {
    minted: Mutex<Vec<Weak<ReentrantMutex<()>>>>,
}

impl LockPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self {
            minted: Mutex::new(Vec::new()),
        }
    }

    /// Mints a fresh lock; the returned handle is its only strong reference.
    pub fn mint(&self) -> SharedLock {
        let inner = Arc::new(ReentrantMutex::new(()));
        let mut minted = self.minted.lock();
        minted.retain(|weak| weak.strong_count() > 0);
        minted.push(Arc::downgrade(&inner));
        SharedLock::from_arc(inner)
    }

    /// Number of minted locks that still have at least one live handle.
    #[must_use]
    pub fn live(&self) -> usize {
        let mut minted = self.minted.lock();
        minted.retain(|weak| weak.strong_count() > 0);
        minted.len()
    }
}

impl Default for LockPool {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LockPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockPool").field("live", &self.live()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minted_locks_are_independent() {
        let pool = LockPool::new();
        let a = pool.mint();
        let b = pool.mint();
        assert!(!a.same_lock(&b));
    }

    #[test]
    fn test_live_tracks_dropped_handles() {
        let pool = LockPool::new();
        let a = pool.mint();
        let b = pool.mint();
        let c = pool.mint();
        assert_eq!(pool.live(), 3);

        drop(b);
        assert_eq!(pool.live(), 2);

        let a2 = a.clone();
        drop(a);
        assert_eq!(pool.live(), 2, "a clone keeps the lock alive");

        drop(a2);
        drop(c);
        assert_eq!(pool.live(), 0);
    }
}
