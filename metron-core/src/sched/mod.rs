//! Timer scheduling
//!
//! Each output record owns a [`Timer`] describing its next callback; the
//! [`TimerQueue`] orders the armed records by wake time.

pub mod queue;
pub mod timer;

pub use queue::{TimerQueue, TIMER_REPEAT_LIMIT};
pub use timer::{Timer, TimerAction};
