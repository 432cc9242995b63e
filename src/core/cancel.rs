//! Generation counter + cooperative cancellation.
//!
//! Every submitted request takes a ticket from [`Generations`].  Work for a
//! ticket is stale as soon as a newer ticket has been issued; long loops poll
//! an [`Interrupt`] and bail out early.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

/// Polled by long computations.
pub trait Interrupt {
    fn is_superseded(&self) -> bool;
}

/// Never interrupts.
#[derive(Clone, Copy, Debug, Default)]
pub struct Never;

impl Interrupt for Never {
    #[inline]
    fn is_superseded(&self) -> bool {
        false
    }
}

/// Shared, monotonically increasing ticket source.  Cheap to clone.
#[derive(Clone, Debug, Default)]
pub struct Generations(Arc<AtomicU64>);

impl Generations {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh ticket, superseding every earlier one.
    #[inline]
    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::AcqRel) + 1
    }

    #[inline]
    #[must_use]
    pub fn latest(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn token(&self, ticket: u64) -> CancelToken {
        CancelToken {
            generations: self.clone(),
            ticket,
        }
    }
}

/// Becomes superseded once a ticket newer than its own is issued.
#[derive(Clone, Debug)]
pub struct CancelToken {
    generations: Generations,
    ticket: u64,
}

impl CancelToken {
    #[inline]
    #[must_use]
    pub fn ticket(&self) -> u64 {
        self.ticket
    }
}

impl Interrupt for CancelToken {
    #[inline]
    fn is_superseded(&self) -> bool {
        self.generations.latest() != self.ticket
    }
}
