//! Timer queue
//!
//! Fixed-capacity list of armed oids ordered by wake time. Ordering uses
//! the wraparound comparison, so it stays correct across counter rollover
//! as long as every armed timer lies within 2^31 ticks of the others.

use heapless::Vec;

use crate::clock::{is_before, Ticks};
use crate::error::ShutdownReason;

/// Maximum callbacks a single dispatch pass may run
///
/// A toggling soft-PWM with zero-length pulses would otherwise keep the
/// dispatcher busy forever.
pub const TIMER_REPEAT_LIMIT: usize = 1000;

/// Armed timers ordered by wake time
#[derive(Debug, Clone)]
pub struct TimerQueue<const N: usize> {
    /// (oid, waketime), earliest first
    entries: Vec<(u8, Ticks), N>,
}

impl<const N: usize> Default for TimerQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> TimerQueue<N> {
    /// Create an empty queue
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Arm `oid` at `waketime`
    ///
    /// The caller must have removed any earlier arm of the same oid.
    /// Timers with equal wake times run in the order they were armed.
    pub fn add(&mut self, oid: u8, waketime: Ticks) -> Result<(), ShutdownReason> {
        debug_assert!(!self.contains(oid));
        let index = self
            .entries
            .iter()
            .position(|&(_, t)| is_before(waketime, t))
            .unwrap_or(self.entries.len());
        self.entries
            .insert(index, (oid, waketime))
            .map_err(|_| ShutdownReason::TimerTooClose)
    }

    /// Disarm `oid`; returns whether it was armed
    pub fn remove(&mut self, oid: u8) -> bool {
        match self.entries.iter().position(|&(o, _)| o == oid) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Check if `oid` is armed
    pub fn contains(&self, oid: u8) -> bool {
        self.entries.iter().any(|&(o, _)| o == oid)
    }

    /// Wake time of `oid`, if armed
    pub fn waketime_of(&self, oid: u8) -> Option<Ticks> {
        self.entries
            .iter()
            .find(|&&(o, _)| o == oid)
            .map(|&(_, t)| t)
    }

    /// Earliest wake time
    pub fn next_waketime(&self) -> Option<Ticks> {
        self.entries.first().map(|&(_, t)| t)
    }

    /// Remove and return the earliest timer if it is due at `now`
    pub fn pop_due(&mut self, now: Ticks) -> Option<(u8, Ticks)> {
        let &(oid, waketime) = self.entries.first()?;
        if is_before(now, waketime) {
            return None;
        }
        self.entries.remove(0);
        Some((oid, waketime))
    }

    /// Disarm everything
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of armed timers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no timer is armed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
