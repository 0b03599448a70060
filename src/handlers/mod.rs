//! # Typed handler dispatch chains.
//!
//! Producers push values into a [`HandlerList`]; each attached handler either
//! executes inline ([`SyncFnHandler`]), defers to the runtime's thread pool
//! ([`AsyncFnHandler`]), transforms and fans out ([`Processor`]), or routes
//! between independent groups ([`FnParser`] / [`ParserGroups`]).
//!
//! ```text
//!   producer ──► HandlerList<D> ──┬─► SyncFnHandler   (inline, caller thread)
//!                                 ├─► AsyncFnHandler ──► Runtime pool lane
//!                                 ├─► Processor<D,R> ──► HandlerList<R> ─► …
//!                                 └─► FnParser<D> ─┬─► group 0: HandlerList<D>
//!                                                  └─► group N: HandlerList<D>
//! ```
//!
//! The [`attach_sync`]/[`attach_async`] helpers build, attach, and hand back
//! ownership of a handler in one step; they work uniformly against plain
//! handler lists and parser groups (via [`ParserGroups::group`]).

mod async_fn;
mod handler;
mod parser;
mod process_list;
mod processor;
mod sync_fn;

use std::sync::Arc;

use crate::runtime::Runtime;

pub use async_fn::AsyncFnHandler;
pub use handler::{Handler, HandlerList};
pub use parser::{FnParser, ParserGroups};
pub use process_list::ProcessList;
pub use processor::Processor;
pub use sync_fn::SyncFnHandler;

/// Builds a synchronous handler around `func` and attaches it to `list`.
///
/// The returned `Arc` owns the handler: drop it (or call
/// [`SyncFnHandler::detach`]) to remove it from the list.
pub fn attach_sync<D, F>(list: &HandlerList<D>, func: F) -> Arc<SyncFnHandler<D>>
where
    D: 'static,
    F: FnMut(&D) + Send + 'static,
{
    let handler = SyncFnHandler::arc(func);
    list.attach(&handler);
    handler
}

/// Builds an asynchronous handler around `func` and attaches it to `list`.
///
/// Calls are executed on `runtime`'s pool (task type 0, default priority —
/// use [`AsyncFnHandler::route_to`] and attach manually for other lanes). The
/// returned `Arc` owns the handler: drop it (or call
/// [`AsyncFnHandler::detach`]) to remove it from the list.
pub fn attach_async<D, F>(
    runtime: &Arc<Runtime>,
    list: &HandlerList<D>,
    func: F,
) -> Arc<AsyncFnHandler<D>>
where
    D: Clone + Send + 'static,
    F: FnMut(&D) + Send + 'static,
{
    let handler = AsyncFnHandler::arc(Arc::clone(runtime), func);
    list.attach(&handler);
    handler
}
