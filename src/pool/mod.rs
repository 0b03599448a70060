//! Priority-aware, group-partitioned worker-thread pool.
//!
//! Work enters as a job ([`JobHandle`] is the waitable side), is dispatched by
//! task type to a worker group (fixed OS threads + FIFO queue + idle-worker
//! queue), and runs to completion on whichever worker claims it. Pool
//! configurations are described by [`PoolConfig`]/[`GroupConfig`] and built by
//! the [`Runtime`](crate::Runtime).

mod config;
mod container;
mod group;
mod job;
mod os;
mod worker;

pub use config::{GroupConfig, PoolConfig};
pub use job::{JobHandle, DEFAULT_PRIORITY, MAX_PRIORITY};

pub(crate) use container::GroupSet;
pub(crate) use job::JobCore;
