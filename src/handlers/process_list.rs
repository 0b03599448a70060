//! # Per-handler work-submission list.
//!
//! A `ProcessList` is how an asynchronous handler talks to the pool: it wraps
//! each submitted callable in the handler's current [`SharedLock`], forwards
//! it to a [`Runtime`] lane, and keeps the in-flight [`JobHandle`]s so the
//! whole backlog can be waited on ([`drain`](ProcessList::drain), also run on
//! drop). Completed entries are pruned on every submission.

use parking_lot::Mutex;

use crate::error::PoolError;
use crate::list::AttachList;
use crate::locks::SharedLock;
use crate::pool::JobHandle;
use crate::runtime::Runtime;

/// Submission list: in-flight jobs plus the shared lock their bodies run under.
pub struct ProcessList {
    jobs: AttachList<JobHandle>,
    shared: Mutex<SharedLock>,
}

impl ProcessList {
    /// Creates a list whose submissions run under `lock`.
    pub fn new(lock: SharedLock) -> Self {
        Self {
            jobs: AttachList::new(),
            shared: Mutex::new(lock),
        }
    }

    /// Replaces the shared lock. In-flight jobs keep the lock they were
    /// submitted with; only subsequent submissions use the new one.
    pub fn set_shared_lock(&self, lock: SharedLock) {
        *self.shared.lock() = lock;
    }

    /// A handle to the current shared lock.
    pub fn shared_lock(&self) -> SharedLock {
        self.shared.lock().clone()
    }

    /// Submits `func` to the runtime, wrapped so the shared lock is acquired
    /// immediately before and released immediately after the function body.
    ///
    /// Returns as soon as the job is queued or handed to an idle worker.
    pub fn exec<F>(
        &self,
        runtime: &Runtime,
        task_type: usize,
        priority: u32,
        func: F,
    ) -> Result<JobHandle, PoolError>
    where
        F: FnOnce() + Send + 'static,
    {
        let lock = self.shared.lock().clone();
        let handle = runtime.submit_with(task_type, priority, move || {
            let _excluded = lock.lock();
            func();
        })?;
        self.jobs.retain(|job| !job.is_done());
        self.jobs.push_back(handle.clone());
        Ok(handle)
    }

    /// Number of tracked submissions that have not been pruned yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.jobs.len()
    }

    /// Waits for every in-flight submission to complete, logging faults.
    ///
    /// Note: against a zero-worker lane this blocks until the runtime that
    /// owns the lane is torn down (queued jobs are then discarded).
    pub fn drain(&self) {
        let mut backlog = Vec::new();
        self.jobs.map(|job| backlog.push(job.clone()));
        for job in backlog {
            if let Err(fault) = job.wait() {
                log::warn!("drained submission faulted: {} ({})", fault, fault.as_label());
            }
        }
        self.jobs.retain(|job| !job.is_done());
    }
}

impl Drop for ProcessList {
    fn drop(&mut self) {
        self.drain();
    }
}

impl std::fmt::Debug for ProcessList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessList")
            .field("pending", &self.jobs.len())
            .finish()
    }
}
