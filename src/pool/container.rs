//! Task-type-indexed array of worker groups.
//!
//! One `GroupSet` is a fully built pool configuration: group `i` serves task
//! type `i`. Every lane exists (unconfigured ones as empty groups), so
//! dispatch only fails when the task type itself is outside the configured
//! range.

use std::sync::Arc;

use crate::error::PoolError;

use super::config::PoolConfig;
use super::group::WorkerGroup;
use super::job::JobCore;

pub(crate) struct GroupSet {
    groups: Vec<WorkerGroup>,
}

impl GroupSet {
    /// Builds every group (spawning its workers) from `config`.
    pub(crate) fn new(config: &PoolConfig) -> Result<Self, PoolError> {
        let groups = config
            .resolve()?
            .into_iter()
            .enumerate()
            .map(|(task_type, group_config)| WorkerGroup::new(group_config, task_type))
            .collect();
        Ok(Self { groups })
    }

    /// Dispatches `job` to the lane serving `task_type`.
    pub(crate) fn submit(&self, job: Arc<JobCore>, task_type: usize) -> Result<(), PoolError> {
        match self.groups.get(task_type) {
            Some(group) => {
                group.submit(job);
                Ok(())
            }
            None => Err(PoolError::TaskTypeOutOfRange {
                task_type,
                count: self.groups.len(),
            }),
        }
    }

    pub(crate) fn task_types(&self) -> usize {
        self.groups.len()
    }

    #[cfg(test)]
    pub(crate) fn group(&self, task_type: usize) -> Option<&WorkerGroup> {
        self.groups.get(task_type)
    }
}

#[cfg(test)]
mod tests {
    use crate::pool::config::GroupConfig;
    use crate::pool::job::{JobHandle, DEFAULT_PRIORITY};

    use super::super::job::JobCore;
    use super::*;

    #[test]
    fn test_submit_routes_by_task_type() {
        let config = PoolConfig::new(2)
            .with_group(0, GroupConfig::DEFAULT)
            .with_group(1, GroupConfig::DEFAULT);
        let set = GroupSet::new(&config).unwrap();

        let core = JobCore::new(DEFAULT_PRIORITY, Box::new(|| {}));
        let handle = JobHandle::new(core.clone());
        set.submit(core, 1).unwrap();
        handle.wait().unwrap();
    }

    #[test]
    fn test_out_of_range_task_type_is_an_error() {
        let set = GroupSet::new(&PoolConfig::new(1).with_group(0, GroupConfig::DEFAULT)).unwrap();
        let core = JobCore::new(DEFAULT_PRIORITY, Box::new(|| {}));
        assert_eq!(
            set.submit(core, 3),
            Err(PoolError::TaskTypeOutOfRange {
                task_type: 3,
                count: 1
            })
        );
    }

    #[test]
    fn test_unconfigured_lane_exists_but_idles() {
        let config = PoolConfig::new(2).with_group(0, GroupConfig::DEFAULT);
        let set = GroupSet::new(&config).unwrap();

        assert_eq!(set.task_types(), 2);
        assert_eq!(set.group(1).unwrap().thread_count(), 0);

        // Accepted, queued forever (until the set is dropped).
        let core = JobCore::new(DEFAULT_PRIORITY, Box::new(|| {}));
        set.submit(core, 1).unwrap();
        assert_eq!(set.group(1).unwrap().queued_jobs(), 1);
    }
}
