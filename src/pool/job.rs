//! # Unit of deferred work with a completion signal.
//!
//! A job owns a one-shot function, an abstract priority, and a completion flag
//! with an associated condvar. Whoever wants asynchronous execution creates a
//! job (via [`Runtime::submit`](crate::Runtime::submit) or a submission list)
//! and keeps the [`JobHandle`]; the worker that dequeues the job runs it and
//! wakes every waiter.
//!
//! ## Fault isolation
//! Jobs are the unit of fault isolation: a panic inside the function is caught
//! at the execution boundary, recorded on the job as
//! [`JobError::Panicked`], and surfaced only when a caller observes completion
//! through [`JobHandle::wait`]. The worker thread itself always survives.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::error::JobError;

/// Default abstract priority for submitted work.
pub const DEFAULT_PRIORITY: u32 = 50;

/// Highest abstract priority; lower values lean towards idle scheduling.
pub const MAX_PRIORITY: u32 = 100;

struct JobState {
    done: bool,
    fault: Option<JobError>,
}

/// The shared job object: function, priority, completion flag.
pub(crate) struct JobCore {
    priority: u32,
    func: Mutex<Option<Box<dyn FnOnce() + Send>>>,
    state: Mutex<JobState>,
    done_cv: Condvar,
}

impl JobCore {
    pub(crate) fn new(priority: u32, func: Box<dyn FnOnce() + Send>) -> Arc<Self> {
        Arc::new(Self {
            priority: priority.min(MAX_PRIORITY),
            func: Mutex::new(Some(func)),
            state: Mutex::new(JobState {
                done: false,
                fault: None,
            }),
            done_cv: Condvar::new(),
        })
    }

    /// Runs the job's function, catching any panic at the boundary, then marks
    /// completion and wakes every waiter. Running a job twice is a no-op.
    pub(crate) fn run(&self) {
        let func = self.func.lock().take();
        let fault = match func {
            Some(func) => catch_unwind(AssertUnwindSafe(func))
                .err()
                .map(|payload| JobError::Panicked {
                    message: panic_message(payload.as_ref()),
                }),
            None => return,
        };
        self.finish(fault);
    }

    /// Completes the job without running it, recording `Discarded`. Used when
    /// the owning group shuts down with the job still queued.
    pub(crate) fn discard(&self) {
        self.func.lock().take();
        self.finish(Some(JobError::Discarded));
    }

    fn finish(&self, fault: Option<JobError>) {
        let mut state = self.state.lock();
        if state.done {
            return;
        }
        state.done = true;
        state.fault = fault;
        self.done_cv.notify_all();
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "opaque panic payload".to_string()
    }
}

/// Waitable handle to a submitted job.
///
/// Handles are cheap to clone; every clone refers to the same job and every
/// waiter is woken on completion. Dropping all handles before the job has run
/// is safe — the scheduler keeps the job alive until it executes.
#[derive(Clone)]
pub struct JobHandle {
    core: Arc<JobCore>,
}

impl JobHandle {
    pub(crate) fn new(core: Arc<JobCore>) -> Self {
        Self { core }
    }

    pub(crate) fn core(&self) -> &Arc<JobCore> {
        &self.core
    }

    /// The job's abstract priority (0–100).
    #[must_use]
    pub fn priority(&self) -> u32 {
        self.core.priority
    }

    /// `true` once the job has completed (successfully, faulted, or discarded).
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.core.state.lock().done
    }

    /// Blocks until the job completes, then surfaces any recorded fault.
    pub fn wait(&self) -> Result<(), JobError> {
        let mut state = self.core.state.lock();
        while !state.done {
            self.core.done_cv.wait(&mut state);
        }
        match &state.fault {
            Some(fault) => Err(fault.clone()),
            None => Ok(()),
        }
    }

    /// Waits up to `timeout` for completion.
    ///
    /// Returns `None` on timeout, otherwise the same result as
    /// [`wait`](Self::wait).
    pub fn wait_for(&self, timeout: Duration) -> Option<Result<(), JobError>> {
        let deadline = Instant::now() + timeout;
        let mut state = self.core.state.lock();
        while !state.done {
            if self.core.done_cv.wait_until(&mut state, deadline).timed_out() {
                return None;
            }
        }
        match &state.fault {
            Some(fault) => Some(Err(fault.clone())),
            None => Some(Ok(())),
        }
    }
}

impl std::fmt::Debug for JobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobHandle")
            .field("priority", &self.core.priority)
            .field("done", &self.is_done())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[test]
    fn test_run_completes_and_wakes_waiter() {
        let hits = Arc::new(AtomicU32::new(0));
        let hits2 = Arc::clone(&hits);
        let core = JobCore::new(
            DEFAULT_PRIORITY,
            Box::new(move || {
                hits2.fetch_add(1, Ordering::SeqCst);
            }),
        );
        let handle = JobHandle::new(Arc::clone(&core));

        assert!(!handle.is_done());
        core.run();
        assert!(handle.is_done());
        assert_eq!(handle.wait(), Ok(()));
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        core.run();
        assert_eq!(hits.load(Ordering::SeqCst), 1, "second run must be a no-op");
    }

    #[test]
    fn test_panic_is_recorded_not_propagated() {
        let core = JobCore::new(DEFAULT_PRIORITY, Box::new(|| panic!("boom")));
        let handle = JobHandle::new(Arc::clone(&core));

        core.run(); // must not unwind into the caller
        match handle.wait() {
            Err(JobError::Panicked { message }) => assert_eq!(message, "boom"),
            other => panic!("expected a recorded panic, got {other:?}"),
        }
    }

    #[test]
    fn test_discard_surfaces_to_waiter() {
        let core = JobCore::new(DEFAULT_PRIORITY, Box::new(|| {}));
        let handle = JobHandle::new(Arc::clone(&core));
        core.discard();
        assert_eq!(handle.wait(), Err(JobError::Discarded));
    }

    #[test]
    fn test_priority_is_clamped() {
        let core = JobCore::new(400, Box::new(|| {}));
        let handle = JobHandle::new(core);
        assert_eq!(handle.priority(), MAX_PRIORITY);
    }

    #[test]
    fn test_wait_for_times_out_on_pending_job() {
        let core = JobCore::new(DEFAULT_PRIORITY, Box::new(|| {}));
        let handle = JobHandle::new(core);
        assert!(handle.wait_for(Duration::from_millis(20)).is_none());
    }
}
