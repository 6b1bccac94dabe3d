//! Embassy async tasks
//!
//! Commands and timers both go through the shared MCU; the tasks only move
//! bytes and wait for the next due tick.

pub mod command_rx;
pub mod response_tx;
pub mod timer;

pub use command_rx::command_rx_task;
pub use response_tx::response_tx_task;
pub use timer::timer_task;
