//! # Worker group: a fixed worker pool plus its job and idle queues.
//!
//! One group owns a fixed array of workers (created at construction, joined at
//! destruction), a FIFO job queue, and a FIFO queue of currently idle workers.
//! Both queues live under a single mutex, which is what makes the scheduling
//! invariant checkable at every step: **a worker is in the idle queue iff it
//! has no assigned job**.
//!
//! ## Dispatch policy
//! [`submit`](WorkerGroup::submit) hands the job straight to the
//! longest-parked idle worker when one exists — the job never touches the
//! queue, so latency under low load is one mailbox wakeup. With no idle
//! worker the job is appended to the FIFO queue and claimed by the next
//! worker that finishes.
//!
//! ## Teardown
//! Dropping the group stops parked workers, lets running workers drain the
//! remaining queue, joins every thread, and discards anything still queued
//! (possible only in zero-worker groups) so waiters are never stranded.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use super::config::GroupConfig;
use super::job::JobCore;
use super::worker::{Worker, WorkerShared};

/// Outcome of a worker asking its group for work.
pub(crate) enum Assignment {
    /// Run this job now.
    Run(Arc<JobCore>),
    /// Nothing queued; the worker was registered idle and should park.
    Park,
    /// The group is stopping and the queue is drained.
    Exit,
}

struct GroupCore {
    queue: VecDeque<Arc<JobCore>>,
    idle: VecDeque<Arc<WorkerShared>>,
    stopping: bool,
}

/// Queue state shared between a group and its workers.
pub(crate) struct GroupShared {
    core: Mutex<GroupCore>,
}

impl GroupShared {
    fn new() -> Self {
        Self {
            core: Mutex::new(GroupCore {
                queue: VecDeque::new(),
                idle: VecDeque::new(),
                stopping: false,
            }),
        }
    }

    /// Called by a worker between jobs. Queue draining takes precedence over
    /// stopping so shutdown never abandons dequeued-able work.
    pub(crate) fn next_assignment(&self, worker: &Arc<WorkerShared>) -> Assignment {
        let mut core = self.core.lock();
        if let Some(job) = core.queue.pop_front() {
            Assignment::Run(job)
        } else if core.stopping {
            Assignment::Exit
        } else {
            core.idle.push_back(Arc::clone(worker));
            Assignment::Park
        }
    }
}

/// Fixed pool of workers serving one task-type lane.
pub(crate) struct WorkerGroup {
    shared: Arc<GroupShared>,
    workers: Vec<Worker>,
}

impl WorkerGroup {
    /// Creates the group and spawns its workers. `task_type` only names the
    /// threads for diagnostics.
    pub(crate) fn new(config: GroupConfig, task_type: usize) -> Self {
        let shared = Arc::new(GroupShared::new());
        let workers = (0..config.threads)
            .map(|i| {
                Worker::spawn(
                    Arc::clone(&shared),
                    config.priority,
                    format!("eventloom-t{task_type}-w{i}"),
                )
            })
            .collect();
        log::debug!(
            "worker group for task type {task_type} up: {} thread(s), priority {}",
            config.threads,
            config.priority
        );
        Self { shared, workers }
    }

    /// Queues a job, or hands it straight to an idle worker when one exists.
    pub(crate) fn submit(&self, job: Arc<JobCore>) {
        let mut core = self.shared.core.lock();
        if let Some(worker) = core.idle.pop_front() {
            worker.assign(job);
        } else {
            core.queue.push_back(job);
            log::trace!("no idle worker, job queued (depth {})", core.queue.len());
        }
    }

    #[cfg(test)]
    pub(crate) fn thread_count(&self) -> usize {
        self.workers.len()
    }

    #[cfg(test)]
    pub(crate) fn queued_jobs(&self) -> usize {
        self.shared.core.lock().queue.len()
    }

    #[cfg(test)]
    pub(crate) fn idle_workers(&self) -> usize {
        self.shared.core.lock().idle.len()
    }
}

impl Drop for WorkerGroup {
    fn drop(&mut self) {
        {
            let mut core = self.shared.core.lock();
            core.stopping = true;
            while let Some(worker) = core.idle.pop_front() {
                worker.stop();
            }
        }
        for worker in &mut self.workers {
            worker.join();
        }
        let mut core = self.shared.core.lock();
        while let Some(job) = core.queue.pop_front() {
            log::warn!("discarding job queued on a stopped worker group");
            job.discard();
        }
    }
}
