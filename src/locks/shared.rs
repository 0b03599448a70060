//! # Reference-counted shared lock handle.
//!
//! A [`SharedLock`] is a cloneable handle to one underlying re-entrant mutex.
//! Cloning the handle is the reference count: every clone refers to the same
//! mutex, and the mutex is torn down automatically when the last clone is
//! dropped. Independent components (e.g. several handlers that must never run
//! concurrently) can each hold a copy and thereby serialize against each other
//! without knowing about one another.
//!
//! ## Guarantees
//! - The underlying mutex stays alive and lockable as long as any handle
//!   referring to it exists; teardown races against a concurrent clone are
//!   impossible (shared ownership, not manual count arithmetic).
//! - Same-thread nested acquisition is re-entrant.

use std::sync::Arc;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

/// Cloneable handle to one shared, re-entrant mutex.
///
/// # Example
/// ```
/// use eventloom::SharedLock;
///
/// let lock = SharedLock::new();
/// let copy = lock.clone();
/// assert!(lock.same_lock(&copy));
/// assert_eq!(lock.handle_count(), 2);
///
/// let _outer = lock.lock();
/// let _inner = lock.lock(); // same-thread re-entry is fine
/// ```
#[derive(Clone)]
pub struct SharedLock {
    inner: Arc<ReentrantMutex<()>>,
}

impl SharedLock {
    /// Allocates a fresh mutex with this handle as its only reference.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ReentrantMutex::new(())),
        }
    }

    pub(crate) fn from_arc(inner: Arc<ReentrantMutex<()>>) -> Self {
        Self { inner }
    }

    /// Acquires the underlying mutex, blocking until it is available.
    ///
    /// The lock is released when the returned guard is dropped.
    pub fn lock(&self) -> ReentrantMutexGuard<'_, ()> {
        self.inner.lock()
    }

    /// Number of handles currently referring to the underlying mutex.
    #[must_use]
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// `true` if both handles refer to the same underlying mutex.
    #[must_use]
    pub fn same_lock(&self, other: &SharedLock) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for SharedLock {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SharedLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedLock")
            .field("handles", &self.handle_count())
            .finish()
    }
}
