//! Error types used across the dispatch chain and the thread pool.
//!
//! This module defines three error enums:
//!
//! - [`DispatchError`] — range and registration errors on the attach surfaces
//!   (parser groups, bus tables, bus maps).
//! - [`PoolError`] — range errors on the scheduling surfaces (task types, pool
//!   configurations).
//! - [`JobError`] — faults recorded on a job and surfaced to whoever waits on it.
//!
//! All types provide `as_label()` for short stable identifiers in logs.

use thiserror::Error;

/// Errors produced by the handler attach/registration surfaces.
///
/// These reflect misuse of an explicit, fallible surface (a group index, a bus
/// slot, a bus key) and are returned to the caller rather than panicking.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// A parser group index was outside the configured group range.
    #[error("group index {index} out of range (group count {count})")]
    GroupOutOfRange {
        /// The requested group index.
        index: usize,
        /// The number of configured groups.
        count: usize,
    },

    /// A bus slot index was outside the configured slot range.
    #[error("bus slot {index} out of range (slot count {count})")]
    SlotOutOfRange {
        /// The requested slot index.
        index: usize,
        /// The number of configured slots.
        count: usize,
    },

    /// A bus slot already holds a handler list.
    #[error("bus slot {index} is already occupied")]
    SlotOccupied {
        /// The contested slot index.
        index: usize,
    },

    /// A bus slot holds no handler list.
    #[error("bus slot {index} is empty")]
    SlotEmpty {
        /// The empty slot index.
        index: usize,
    },

    /// No handler list is registered under the requested bus key.
    #[error("no handler list registered for the requested key")]
    UnknownKey,
}

impl DispatchError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchError::GroupOutOfRange { .. } => "group_out_of_range",
            DispatchError::SlotOutOfRange { .. } => "slot_out_of_range",
            DispatchError::SlotOccupied { .. } => "slot_occupied",
            DispatchError::SlotEmpty { .. } => "slot_empty",
            DispatchError::UnknownKey => "unknown_key",
        }
    }
}

/// Errors produced by the thread-pool scheduling surfaces.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// The requested task type has no lane in the active configuration.
    #[error("task type {task_type} out of range (task type count {count})")]
    TaskTypeOutOfRange {
        /// The requested task type.
        task_type: usize,
        /// The number of task types in the active configuration.
        count: usize,
    },

    /// The requested pool configuration id is not registered.
    #[error("pool configuration {config} not registered (config count {count})")]
    ConfigOutOfRange {
        /// The requested configuration id.
        config: usize,
        /// The number of registered configurations.
        count: usize,
    },
}

impl PoolError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            PoolError::TaskTypeOutOfRange { .. } => "task_type_out_of_range",
            PoolError::ConfigOutOfRange { .. } => "config_out_of_range",
        }
    }
}

/// Faults recorded on a job and observed through [`JobHandle::wait`].
///
/// A fault never terminates the worker that produced it; it is stored on the job
/// and re-raised only to the waiter.
///
/// [`JobHandle::wait`]: crate::JobHandle::wait
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JobError {
    /// The job's function panicked on the worker thread.
    #[error("job panicked: {message}")]
    Panicked {
        /// The captured panic message.
        message: String,
    },

    /// The owning worker group shut down before the job was ever dequeued.
    #[error("job discarded: worker group shut down before execution")]
    Discarded,
}

impl JobError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            JobError::Panicked { .. } => "job_panicked",
            JobError::Discarded => "job_discarded",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        let err = DispatchError::GroupOutOfRange { index: 7, count: 2 };
        assert_eq!(err.as_label(), "group_out_of_range");

        let err = PoolError::TaskTypeOutOfRange {
            task_type: 3,
            count: 1,
        };
        assert_eq!(err.as_label(), "task_type_out_of_range");

        let err = JobError::Discarded;
        assert_eq!(err.as_label(), "job_discarded");
    }

    #[test]
    fn test_display_carries_context() {
        let err = DispatchError::SlotOccupied { index: 4 };
        assert_eq!(err.to_string(), "bus slot 4 is already occupied");

        let err = PoolError::ConfigOutOfRange { config: 9, count: 2 };
        assert!(err.to_string().contains('9'));
    }
}
