//! # Parsers: routed fan-out over independent handler groups.
//!
//! A parser owns several independent handler groups instead of one downstream
//! list, and its call logic decides which group(s) a datum goes to.
//! [`ParserGroups`] is the attachment bookkeeping every parser embeds;
//! [`FnParser`] is the closure-routed concrete parser. Custom parsers embed a
//! `ParserGroups` and implement [`Handler`] themselves.
//!
//! Attaching to a group that does not exist fails with
//! [`DispatchError::GroupOutOfRange`]; *routing* to one inside `call` is a
//! contract violation and panics.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::error::DispatchError;
use crate::list::Position;
use crate::observer::Anchor;

use super::handler::{Handler, HandlerList};

/// Attachment bookkeeping: a growable set of independent handler groups.
pub struct ParserGroups<D> {
    groups: RwLock<Vec<Arc<HandlerList<D>>>>,
}

impl<D: 'static> ParserGroups<D> {
    /// Creates `count` empty groups.
    pub fn new(count: usize) -> Self {
        Self {
            groups: RwLock::new((0..count).map(|_| Arc::new(HandlerList::new())).collect()),
        }
    }

    /// Grows or shrinks the group set. Shrinking drops the surplus groups,
    /// detaching every handler attached to them.
    pub fn set_group_count(&self, count: usize) {
        let mut groups = self.groups.write();
        if count < groups.len() {
            groups.truncate(count);
        } else {
            while groups.len() < count {
                groups.push(Arc::new(HandlerList::new()));
            }
        }
    }

    /// Number of groups.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.read().len()
    }

    /// The handler list backing group `index`.
    ///
    /// The returned list is usable with the uniform attach helpers.
    pub fn group(&self, index: usize) -> Result<Arc<HandlerList<D>>, DispatchError> {
        let groups = self.groups.read();
        groups
            .get(index)
            .cloned()
            .ok_or(DispatchError::GroupOutOfRange {
                index,
                count: groups.len(),
            })
    }

    /// Attaches `handler` to exactly one group.
    pub fn attach<H>(&self, index: usize, handler: &Arc<H>) -> Result<Position, DispatchError>
    where
        H: Handler<D> + 'static,
    {
        Ok(self.group(index)?.attach(handler))
    }

    /// Delivers `data` to every handler of group `index`.
    pub fn call_group(&self, index: usize, data: &D) -> Result<(), DispatchError> {
        self.group(index)?.call(data);
        Ok(())
    }

    /// Delivers `data` to every group.
    pub fn broadcast(&self, data: &D) {
        let groups: Vec<_> = self.groups.read().iter().cloned().collect();
        for group in groups {
            group.call(data);
        }
    }
}

impl<D> std::fmt::Debug for ParserGroups<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserGroups")
            .field("groups", &self.groups.read().len())
            .finish()
    }
}

type BoxedRoute<D> = Box<dyn FnMut(&D) -> Option<usize> + Send>;

/// Parser whose routing decision is a closure.
///
/// The closure returns the target group for each datum, or `None` to drop it.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use eventloom::{FnParser, Handler, SyncFnHandler};
///
/// // Route even values to group 0, odd values to group 1.
/// let parser = FnParser::arc(2, |v: &u32| Some((*v % 2) as usize));
///
/// let evens = Arc::new(AtomicU32::new(0));
/// let evens2 = Arc::clone(&evens);
/// let sink = SyncFnHandler::arc(move |v: &u32| {
///     evens2.fetch_add(*v, Ordering::SeqCst);
/// });
/// parser.groups().attach(0, &sink).unwrap();
///
/// parser.call(&4);
/// parser.call(&5); // no handler in group 1; delivered nowhere
/// assert_eq!(evens.load(Ordering::SeqCst), 4);
/// ```
pub struct FnParser<D> {
    groups: ParserGroups<D>,
    route: Mutex<BoxedRoute<D>>,
    anchor: Anchor<dyn Handler<D>>,
}

impl<D: 'static> FnParser<D> {
    /// Creates a parser with `group_count` groups and the given router.
    pub fn new(group_count: usize, route: impl FnMut(&D) -> Option<usize> + Send + 'static) -> Self {
        Self {
            groups: ParserGroups::new(group_count),
            route: Mutex::new(Box::new(route)),
            anchor: Anchor::new(),
        }
    }

    /// Shorthand for `Arc::new(Self::new(group_count, route))`.
    pub fn arc(
        group_count: usize,
        route: impl FnMut(&D) -> Option<usize> + Send + 'static,
    ) -> Arc<Self> {
        Arc::new(Self::new(group_count, route))
    }

    /// The parser's group bookkeeping (attach surface).
    pub fn groups(&self) -> &ParserGroups<D> {
        &self.groups
    }

    /// Detaches from the current upstream list, if attached. Idempotent.
    pub fn detach(&self) -> bool {
        self.anchor.detach()
    }
}

impl<D: 'static> Handler<D> for FnParser<D> {
    /// Routes `data` to the group picked by the routing closure.
    ///
    /// # Panics
    /// Panics if the closure names a group that does not exist.
    fn call(&self, data: &D) {
        let target = {
            let mut route = self.route.lock();
            (*route)(data)
        };
        if let Some(index) = target {
            self.groups
                .call_group(index, data)
                .expect("parser routed to a group that does not exist");
        }
    }

    fn anchor(&self) -> &Anchor<dyn Handler<D>> {
        &self.anchor
    }
}

impl<D> std::fmt::Debug for FnParser<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnParser")
            .field("groups", &self.groups.groups.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use crate::handlers::SyncFnHandler;

    use super::*;

    fn sink(counter: &Arc<AtomicU32>) -> Arc<SyncFnHandler<u32>> {
        let counter = Arc::clone(counter);
        SyncFnHandler::arc(move |v: &u32| {
            counter.fetch_add(*v, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_routes_to_exactly_one_group() {
        let parser = FnParser::new(2, |v: &u32| Some((*v % 2) as usize));
        let evens = Arc::new(AtomicU32::new(0));
        let odds = Arc::new(AtomicU32::new(0));
        let even_sink = sink(&evens);
        let odd_sink = sink(&odds);
        parser.groups().attach(0, &even_sink).unwrap();
        parser.groups().attach(1, &odd_sink).unwrap();

        for v in 1..=6u32 {
            parser.call(&v);
        }
        assert_eq!(evens.load(Ordering::SeqCst), 2 + 4 + 6);
        assert_eq!(odds.load(Ordering::SeqCst), 1 + 3 + 5);
    }

    #[test]
    fn test_attach_out_of_range_fails() {
        let groups: ParserGroups<u32> = ParserGroups::new(2);
        let counter = Arc::new(AtomicU32::new(0));
        let handler = sink(&counter);

        assert_eq!(
            groups.attach(2, &handler).unwrap_err(),
            DispatchError::GroupOutOfRange { index: 2, count: 2 }
        );
    }

    #[test]
    fn test_broadcast_hits_every_group() {
        let groups: ParserGroups<u32> = ParserGroups::new(3);
        let counter = Arc::new(AtomicU32::new(0));
        let sinks: Vec<_> = (0..3)
            .map(|i| {
                let s = sink(&counter);
                groups.attach(i, &s).unwrap();
                s
            })
            .collect();

        groups.broadcast(&1);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
        drop(sinks);
    }

    #[test]
    fn test_group_count_can_grow() {
        let groups: ParserGroups<u32> = ParserGroups::new(1);
        groups.set_group_count(4);
        assert_eq!(groups.group_count(), 4);

        let counter = Arc::new(AtomicU32::new(0));
        let handler = sink(&counter);
        groups.attach(3, &handler).unwrap();
        groups.call_group(3, &9).unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 9);
    }

    #[test]
    fn test_shrinking_detaches_surplus_group_handlers() {
        let groups: ParserGroups<u32> = ParserGroups::new(2);
        let counter = Arc::new(AtomicU32::new(0));
        let handler = sink(&counter);
        groups.attach(1, &handler).unwrap();
        assert!(handler.is_attached());

        groups.set_group_count(1);
        assert!(
            !handler.is_attached(),
            "dropping a group must orphan its handlers cleanly"
        );
    }

    #[test]
    #[should_panic(expected = "group that does not exist")]
    fn test_routing_out_of_range_panics() {
        let parser = FnParser::new(1, |_: &u32| Some(9));
        parser.call(&1);
    }

    #[test]
    fn test_none_route_drops_datum() {
        let parser = FnParser::new(1, |_: &u32| None);
        let counter = Arc::new(AtomicU32::new(0));
        let handler = sink(&counter);
        parser.groups().attach(0, &handler).unwrap();

        parser.call(&5);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
}
