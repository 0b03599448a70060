//! # Runtime: the process-wide context object.
//!
//! One `Runtime` owns everything that would otherwise be hidden global state:
//! the registry of built pool configurations, the currently active
//! configuration, and the [`LockPool`] that mints default shared locks for
//! asynchronous handlers. It is constructed explicitly at startup and shared
//! by cheap `Arc` cloning; dropping the last reference joins every worker
//! thread, so teardown order is deterministic (no hidden
//! initialization-order hazards and nothing to tear down "at exit").
//!
//! ## Submission surface
//! - [`submit`](Runtime::submit): task type 0 at the default priority —
//!   always valid, every configuration has at least one lane.
//! - [`submit_with`](Runtime::submit_with): explicit task type and priority;
//!   fails with [`PoolError::TaskTypeOutOfRange`] on a lane the active
//!   configuration does not have.
//!
//! ## Configurations
//! A runtime starts with one registered configuration (id 0). More can be
//! registered with [`add_config`](Runtime::add_config); switching with
//! [`set_config`](Runtime::set_config) affects subsequent submissions only —
//! lanes of the previous configuration keep draining work already handed to
//! them, and their workers are joined when the runtime drops.
//!
//! ## Example
//! ```
//! use eventloom::Runtime;
//!
//! let runtime = Runtime::new();
//! let job = runtime.submit(|| { /* work */ });
//! job.wait().unwrap();
//! ```

use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::PoolError;
use crate::locks::LockPool;
use crate::pool::{GroupSet, JobCore, JobHandle, PoolConfig, DEFAULT_PRIORITY};

/// Context object owning the pool configurations and the lock pool.
pub struct Runtime {
    configs: RwLock<Vec<Arc<GroupSet>>>,
    active: RwLock<Arc<GroupSet>>,
    locks: LockPool,
}

impl Runtime {
    /// Creates a runtime with the default pool configuration: one task type
    /// served by `available_parallelism` workers at the default priority.
    pub fn new() -> Arc<Self> {
        Self::with_config(PoolConfig::default())
            .expect("the default pool configuration is always valid")
    }

    /// Creates a runtime whose configuration id 0 is `config`.
    pub fn with_config(config: PoolConfig) -> Result<Arc<Self>, PoolError> {
        let initial = Arc::new(GroupSet::new(&config)?);
        Ok(Arc::new(Self {
            configs: RwLock::new(vec![Arc::clone(&initial)]),
            active: RwLock::new(initial),
            locks: LockPool::new(),
        }))
    }

    /// Builds `config` (spawning its workers) and registers it, returning its
    /// configuration id. The new configuration is not activated.
    pub fn add_config(&self, config: PoolConfig) -> Result<usize, PoolError> {
        let built = Arc::new(GroupSet::new(&config)?);
        let mut configs = self.configs.write();
        configs.push(built);
        Ok(configs.len() - 1)
    }

    /// Makes configuration `id` the target of subsequent submissions.
    pub fn set_config(&self, id: usize) -> Result<(), PoolError> {
        let configs = self.configs.read();
        let selected = configs.get(id).ok_or(PoolError::ConfigOutOfRange {
            config: id,
            count: configs.len(),
        })?;
        *self.active.write() = Arc::clone(selected);
        Ok(())
    }

    /// Number of registered configurations.
    #[must_use]
    pub fn config_count(&self) -> usize {
        self.configs.read().len()
    }

    /// Number of task-type lanes in the active configuration.
    #[must_use]
    pub fn task_types(&self) -> usize {
        self.active.read().task_types()
    }

    /// Submits `func` to task type 0 at the default priority.
    pub fn submit<F>(&self, func: F) -> JobHandle
    where
        F: FnOnce() + Send + 'static,
    {
        self.submit_with(0, DEFAULT_PRIORITY, func)
            .expect("task type 0 exists in every configuration")
    }

    /// Submits `func` to the given task type at the given priority (0–100).
    ///
    /// Returns as soon as the job is queued or handed to an idle worker; the
    /// returned handle can be waited on for completion.
    pub fn submit_with<F>(
        &self,
        task_type: usize,
        priority: u32,
        func: F,
    ) -> Result<JobHandle, PoolError>
    where
        F: FnOnce() + Send + 'static,
    {
        let job = JobCore::new(priority, Box::new(func));
        let active = Arc::clone(&self.active.read());
        active.submit(Arc::clone(&job), task_type)?;
        Ok(JobHandle::new(job))
    }

    /// The runtime's lock pool.
    pub fn lock_pool(&self) -> &LockPool {
        &self.locks
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("configs", &self.config_count())
            .field("task_types", &self.task_types())
            .finish()
    }
}
