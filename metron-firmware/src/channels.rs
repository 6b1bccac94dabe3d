//! Inter-task communication channels
//!
//! The MCU itself lives in [`crate::MCU`]; these only carry wakeups and
//! outgoing responses between the tasks around it.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use metron_protocol::Response;

/// Responses waiting for the UART
const RESPONSE_QUEUE_SIZE: usize = 4;

/// Responses to send to the host
pub static RESPONSES: Channel<CriticalSectionRawMutex, Response<'static>, RESPONSE_QUEUE_SIZE> =
    Channel::new();

/// A command may have changed the timer queue; recompute the next wake
pub static TIMER_WAKE: Signal<CriticalSectionRawMutex, ()> = Signal::new();
