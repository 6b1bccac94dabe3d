//! Timer callbacks
//!
//! A callback is a small enum owned by the record it belongs to. When the
//! record's timer fires, the record dispatches on that enum and tells the
//! scheduler what to do next through a [`TimerAction`].

use crate::clock::Ticks;

/// Result of a timer callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerAction {
    /// Leave the timer unarmed
    Complete,
    /// Re-arm at the given absolute tick
    RescheduleAt(Ticks),
}

/// Per-record timer state
///
/// `E` is the record's closed set of callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timer<E> {
    /// Absolute tick the callback runs at
    pub waketime: Ticks,
    /// Callback to run
    pub event: E,
}

impl<E> Timer<E> {
    /// Create a timer for `event` at `waketime`
    pub const fn new(waketime: Ticks, event: E) -> Self {
        Self { waketime, event }
    }
}
