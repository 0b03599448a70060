//! Ownership-safe subscriber/publisher pair.
//!
//! A subscriber embeds an [`Anchor`] (a single-seat weak back-reference); a
//! [`Publisher`] owns the attach list the anchors point into. Neither side
//! owns the other, so destruction order is free: dropping a subscriber
//! removes its entry, dropping a publisher strands only weak references that
//! detach as no-ops.

mod anchor;
mod publisher;

pub use anchor::Anchor;
pub use publisher::{Publisher, Subscriber};
