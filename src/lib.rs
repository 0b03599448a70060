//! # eventloom
//!
//! **eventloom** is an in-process concurrency substrate: thread-safe
//! attach/detach lists, typed handler dispatch chains built on top of them,
//! and a priority-aware, group-partitioned pool of OS worker threads that
//! asynchronous handlers delegate work to.
//!
//! It is not an actor runtime and not an RPC layer — it is the plumbing a
//! larger system builds those out of.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  producers                dispatch chain                     execution
//!  ─────────   ┌──────────────────────────────────────┐   ┌───────────────────┐
//!  call(&d) ──►│ HandlerList<D>  (attach/detach safe)  │   │ Runtime           │
//!              │   ├─ SyncFnHandler   ── inline ───────┼──►│  (caller thread)  │
//!              │   ├─ AsyncFnHandler ── ProcessList ───┼──►│  pool lane by     │
//!              │   │     └ SharedLock around the body  │   │  task type:       │
//!              │   ├─ Processor<D,R> ─► HandlerList<R> │   │   WorkerGroup     │
//!              │   └─ FnParser<D>   ─► group 0..N      │   │    ├ idle queue   │
//!              └──────────────────────────────────────┘   │    └ FIFO queue   │
//!                                                          └───────────────────┘
//! ```
//!
//! ### The pieces
//! | Area              | Description                                                   | Key types                                    |
//! |-------------------|---------------------------------------------------------------|----------------------------------------------|
//! | **Attach list**   | Concurrent sequence with stable O(1)-removal handles.         | [`AttachList`], [`Position`]                 |
//! | **Observer pair** | Weak-linked subscriber/publisher with auto-detach on drop.    | [`Anchor`], [`Subscriber`], [`Publisher`]    |
//! | **Dispatch**      | Typed handler chains: inline, pooled, transforming, routed.   | [`HandlerList`], [`Handler`], [`Processor`]  |
//! | **Shared locks**  | Reference-counted mutex handles shared across components.     | [`SharedLock`], [`LockPool`]                 |
//! | **Thread pool**   | Task-type lanes of fixed OS worker threads, waitable jobs.    | [`Runtime`], [`PoolConfig`], [`JobHandle`]   |
//! | **Buses/queues**  | Registries of handler lists; spliceable event FIFOs.          | [`BusTable`], [`BusMap`], [`EventQueue`]     |
//!
//! ## Guarantees
//! - Every list, publisher, queue, and pool structure is internally
//!   synchronized; individual operations need no external locking.
//! - Fan-out visits handlers in attachment order as of the moment the
//!   traversal starts; a handler may detach itself (even by being dropped)
//!   mid-dispatch.
//! - `call` on an asynchronous handler returns in bounded time regardless of
//!   how long the wrapped function takes.
//! - A panic inside a pooled job is caught at the job boundary, recorded, and
//!   surfaced to `wait()` — worker threads are never lost to user code.
//! - Dropping the last [`Runtime`] reference joins every worker: teardown is
//!   deterministic, with no process-global state left behind.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use eventloom::{attach_async, attach_sync, HandlerList, Runtime};
//!
//! let runtime = Runtime::new();
//! let ticks: HandlerList<u64> = HandlerList::new();
//!
//! let inline_seen = Arc::new(AtomicUsize::new(0));
//! let seen = Arc::clone(&inline_seen);
//! let _sync = attach_sync(&ticks, move |tick: &u64| {
//!     seen.fetch_add(*tick as usize, Ordering::SeqCst);
//! });
//!
//! let pooled_seen = Arc::new(AtomicUsize::new(0));
//! let seen = Arc::clone(&pooled_seen);
//! let pooled = attach_async(&runtime, &ticks, move |tick: &u64| {
//!     seen.fetch_add(*tick as usize, Ordering::SeqCst);
//! });
//!
//! ticks.call(&21);
//! ticks.call(&21);
//!
//! pooled.drain(); // wait for the pooled deliveries
//! assert_eq!(inline_seen.load(Ordering::SeqCst), 42);
//! assert_eq!(pooled_seen.load(Ordering::SeqCst), 42);
//! ```

mod bus;
mod error;
mod handlers;
mod list;
mod locks;
mod observer;
mod pool;
mod queue;
mod runtime;

// ---- Public re-exports ----

pub use bus::{BusMap, BusTable};
pub use error::{DispatchError, JobError, PoolError};
pub use handlers::{
    attach_async, attach_sync, AsyncFnHandler, FnParser, Handler, HandlerList, ParserGroups,
    ProcessList, Processor, SyncFnHandler,
};
pub use list::{AttachList, Position};
pub use locks::{LockPool, SharedLock};
pub use observer::{Anchor, Publisher, Subscriber};
pub use pool::{GroupConfig, JobHandle, PoolConfig, DEFAULT_PRIORITY, MAX_PRIORITY};
pub use queue::{EventLoop, EventQueue};
pub use runtime::Runtime;
