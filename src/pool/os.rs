//! Best-effort mapping of abstract priorities onto OS scheduling.
//!
//! The abstract 0–100 priority is projected onto the host scheduler's own
//! priority range where the platform exposes one. Failures are ignored:
//! elevating scheduling class typically requires privileges, and the pool is
//! fully functional without it.

#[cfg(unix)]
use crate::pool::job::MAX_PRIORITY;

/// Applies `priority` to the calling thread. No-op where unsupported.
#[cfg(unix)]
pub(crate) fn apply_thread_priority(priority: u32) {
    let priority = priority.min(MAX_PRIORITY) as i64;
    unsafe {
        let min = libc::sched_get_priority_min(libc::SCHED_FIFO);
        let max = libc::sched_get_priority_max(libc::SCHED_FIFO);
        if min < 0 || max < min {
            return;
        }
        let span = (max - min) as i64;
        let mapped = min as i64 + span * priority / MAX_PRIORITY as i64;

        let mut param: libc::sched_param = std::mem::zeroed();
        param.sched_priority = mapped as libc::c_int;
        let _ = libc::pthread_setschedparam(libc::pthread_self(), libc::SCHED_FIFO, &param);
    }
}

#[cfg(not(unix))]
pub(crate) fn apply_thread_priority(_priority: u32) {}
