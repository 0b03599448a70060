//! # Pool configuration.
//!
//! A pool configuration is an ordered set of per-task-type group records: how
//! many task-type lanes exist, and for each lane, how many worker threads it
//! gets and at what abstract priority. Task types without a record get an
//! empty (zero-thread) group, so indexing a built pool never fails — an empty
//! group accepts jobs but never runs them, which is a valid if unproductive
//! configuration.
//!
//! ## Example
//! ```
//! use eventloom::{GroupConfig, PoolConfig};
//!
//! // Two lanes: type 0 = 4 CPU-bound workers, type 1 = one background worker.
//! let config = PoolConfig::new(2)
//!     .with_group(0, GroupConfig::new(4, 50))
//!     .with_group(1, GroupConfig::new(1, 10));
//! assert_eq!(config.task_types(), 2);
//! ```

use std::thread;

use crate::error::PoolError;

use super::job::{DEFAULT_PRIORITY, MAX_PRIORITY};

/// Thread count and priority for one worker group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroupConfig {
    /// Number of worker threads in the group.
    pub threads: usize,
    /// Abstract priority (0–100) applied to every thread in the group.
    pub priority: u32,
}

impl GroupConfig {
    /// A group with no threads. Jobs routed to it queue indefinitely.
    pub const EMPTY: GroupConfig = GroupConfig {
        threads: 0,
        priority: 0,
    };

    /// One thread at the default priority.
    pub const DEFAULT: GroupConfig = GroupConfig {
        threads: 1,
        priority: DEFAULT_PRIORITY,
    };

    /// Creates a group config; `priority` is clamped to 0–100.
    pub fn new(threads: usize, priority: u32) -> Self {
        Self {
            threads,
            priority: priority.min(MAX_PRIORITY),
        }
    }
}

/// Ordered description of one pool: task-type count plus group records.
///
/// Later records for the same task type override earlier ones.
#[derive(Clone, Debug)]
pub struct PoolConfig {
    task_types: usize,
    groups: Vec<(usize, GroupConfig)>,
}

impl PoolConfig {
    /// Creates a configuration with `task_types` lanes (at least one) and no
    /// group records yet.
    pub fn new(task_types: usize) -> Self {
        Self {
            task_types: task_types.max(1),
            groups: Vec::new(),
        }
    }

    /// Adds (or overrides) the group record for `task_type`.
    #[must_use]
    pub fn with_group(mut self, task_type: usize, config: GroupConfig) -> Self {
        self.groups.push((task_type, config));
        self
    }

    /// Number of task-type lanes.
    #[must_use]
    pub fn task_types(&self) -> usize {
        self.task_types
    }

    /// Resolves the records into one [`GroupConfig`] per task type, padding
    /// unconfigured lanes with [`GroupConfig::EMPTY`].
    ///
    /// Fails if a record names a task type outside the configured range.
    pub(crate) fn resolve(&self) -> Result<Vec<GroupConfig>, PoolError> {
        let mut resolved = vec![GroupConfig::EMPTY; self.task_types];
        for &(task_type, config) in &self.groups {
            match resolved.get_mut(task_type) {
                Some(slot) => *slot = config,
                None => {
                    return Err(PoolError::TaskTypeOutOfRange {
                        task_type,
                        count: self.task_types,
                    })
                }
            }
        }
        Ok(resolved)
    }
}

impl Default for PoolConfig {
    /// One task type served by one group with `available_parallelism` threads
    /// at the default priority.
    fn default() -> Self {
        let threads = thread::available_parallelism().map_or(1, |n| n.get());
        PoolConfig::new(1).with_group(0, GroupConfig::new(threads, DEFAULT_PRIORITY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_lanes_become_empty_groups() {
        let config = PoolConfig::new(3).with_group(1, GroupConfig::new(2, 80));
        let resolved = config.resolve().unwrap();

        assert_eq!(resolved.len(), 3);
        assert_eq!(resolved[0], GroupConfig::EMPTY);
        assert_eq!(resolved[1], GroupConfig::new(2, 80));
        assert_eq!(resolved[2], GroupConfig::EMPTY);
    }

    #[test]
    fn test_later_record_overrides_earlier() {
        let config = PoolConfig::new(1)
            .with_group(0, GroupConfig::new(2, 50))
            .with_group(0, GroupConfig::new(8, 90));
        let resolved = config.resolve().unwrap();
        assert_eq!(resolved[0].threads, 8);
    }

    #[test]
    fn test_out_of_range_record_is_rejected() {
        let config = PoolConfig::new(2).with_group(5, GroupConfig::DEFAULT);
        assert_eq!(
            config.resolve(),
            Err(PoolError::TaskTypeOutOfRange {
                task_type: 5,
                count: 2
            })
        );
    }

    #[test]
    fn test_priority_clamped_at_construction() {
        assert_eq!(GroupConfig::new(1, 1000).priority, MAX_PRIORITY);
    }

    #[test]
    fn test_default_has_at_least_one_worker() {
        let resolved = PoolConfig::default().resolve().unwrap();
        assert_eq!(resolved.len(), 1);
        assert!(resolved[0].threads >= 1);
    }

    #[test]
    fn test_zero_task_types_clamped_to_one() {
        assert_eq!(PoolConfig::new(0).task_types(), 1);
    }
}
