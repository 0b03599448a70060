//! Reference-counted lock handles shared across unrelated components.

mod pool;
mod shared;

pub use pool::LockPool;
pub use shared::SharedLock;
