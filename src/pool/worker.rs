//! # One pool worker: an OS thread with a private mailbox.
//!
//! A worker cycles Idle → Running → Idle until its group stops it:
//!
//! ```text
//! loop {
//!   ask the group for the next assignment (one lock):
//!     ├─ queued job        ─► run it
//!     ├─ group stopping    ─► exit (Stopped)
//!     └─ nothing to do     ─► group records us idle; park on our mailbox
//!                              condvar until a job is handed over directly
//!                              (the idle-worker fast path) or we are stopped
//! }
//! ```
//!
//! The "may I park?" check and the idle-queue registration happen under the
//! group's single lock, so a submission can never slip between "queue is
//! empty" and "worker is parked" — the lost-wakeup window the two-lock design
//! would have.

use std::sync::Arc;
use std::thread;

use parking_lot::{Condvar, Mutex};

use super::group::{Assignment, GroupShared};
use super::job::JobCore;
use super::os;

/// What a parked worker finds in its mailbox when it wakes.
pub(crate) enum Mail {
    Empty,
    Assigned(Arc<JobCore>),
    Stop,
}

/// The half of a worker shared with its group: the assignment mailbox.
pub(crate) struct WorkerShared {
    mailbox: Mutex<Mail>,
    cv: Condvar,
}

impl WorkerShared {
    fn new() -> Self {
        Self {
            mailbox: Mutex::new(Mail::Empty),
            cv: Condvar::new(),
        }
    }

    /// Hands a job directly to a parked worker.
    pub(crate) fn assign(&self, job: Arc<JobCore>) {
        let mut mail = self.mailbox.lock();
        debug_assert!(
            matches!(*mail, Mail::Empty),
            "assigning to a worker that already holds mail"
        );
        *mail = Mail::Assigned(job);
        self.cv.notify_one();
    }

    /// Tells a parked worker to exit.
    pub(crate) fn stop(&self) {
        let mut mail = self.mailbox.lock();
        *mail = Mail::Stop;
        self.cv.notify_one();
    }
}

/// Owner of one worker thread; joining happens on group teardown.
///
/// The thread itself and the group's idle queue hold the [`WorkerShared`]
/// mailbox; stopping goes through the idle queue, so the owner only needs the
/// join handle.
pub(crate) struct Worker {
    thread: Option<thread::JoinHandle<()>>,
}

impl Worker {
    /// Spawns a worker thread serving `group` at the given priority.
    pub(crate) fn spawn(group: Arc<GroupShared>, priority: u32, name: String) -> Self {
        let me = Arc::new(WorkerShared::new());
        let thread = thread::Builder::new()
            .name(name)
            .spawn(move || worker_loop(me, group, priority))
            .expect("failed to spawn pool worker thread");
        Self {
            thread: Some(thread),
        }
    }

    pub(crate) fn join(&mut self) {
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                // run() catches job panics, so this would be a bug in the loop
                log::error!("pool worker thread terminated abnormally");
            }
        }
    }
}

fn worker_loop(me: Arc<WorkerShared>, group: Arc<GroupShared>, priority: u32) {
    os::apply_thread_priority(priority);
    loop {
        match group.next_assignment(&me) {
            Assignment::Run(job) => job.run(),
            Assignment::Exit => break,
            Assignment::Park => {
                let job = {
                    let mut mail = me.mailbox.lock();
                    loop {
                        match std::mem::replace(&mut *mail, Mail::Empty) {
                            Mail::Assigned(job) => break Some(job),
                            Mail::Stop => break None,
                            Mail::Empty => me.cv.wait(&mut mail),
                        }
                    }
                };
                match job {
                    Some(job) => job.run(),
                    None => break,
                }
            }
        }
    }
}
