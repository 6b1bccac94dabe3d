//! Critical-section wrapper around [`Mcu`]
//!
//! The command task and the timer task both reach the MCU through this
//! wrapper. Every access runs inside a critical section, so a schedule's
//! read-decide-write sequence on a record can never interleave with that
//! record's timer callback.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use metron_hal::Board;
use metron_protocol::{Command, Response};

use crate::clock::Ticks;
use crate::config::MAX_OIDS;
use crate::mcu::Mcu;

/// MCU shared between tasks, usable from a `static`
pub struct SharedMcu<B: Board, const N: usize = MAX_OIDS> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Option<Mcu<B, N>>>>,
}

impl<B: Board, const N: usize> Default for SharedMcu<B, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Board, const N: usize> SharedMcu<B, N> {
    /// Create an empty slot; call [`Self::init`] before use
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Install the MCU
    pub fn init(&self, mcu: Mcu<B, N>) {
        self.inner.lock(|cell| *cell.borrow_mut() = Some(mcu));
    }

    /// Run `f` on the MCU inside a critical section
    ///
    /// Returns `None` if the MCU has not been installed.
    pub fn with<R>(&self, f: impl FnOnce(&mut Mcu<B, N>) -> R) -> Option<R> {
        self.inner
            .lock(|cell| cell.borrow_mut().as_mut().map(f))
    }

    /// See [`Mcu::handle`]
    pub fn handle(&self, cmd: &Command) -> Option<Response<'static>> {
        self.with(|mcu| mcu.handle(cmd)).flatten()
    }

    /// Run every timer due at the current board tick
    pub fn run_timers(&self) -> Option<Response<'static>> {
        self.with(|mcu| {
            let now = mcu.now();
            mcu.run_timers(now)
        })
        .flatten()
    }

    /// Earliest armed wake time and the current tick
    pub fn next_waketime(&self) -> Option<(Ticks, Ticks)> {
        self.with(|mcu| mcu.next_waketime().map(|waketime| (waketime, mcu.now())))
            .flatten()
    }

    pub fn is_shutdown(&self) -> bool {
        self.with(|mcu| mcu.is_shutdown()).unwrap_or(false)
    }
}
