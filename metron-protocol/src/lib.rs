//! Host command protocol
//!
//! Commands and responses are single text lines of the form
//! `name key=value ...`:
//!
//! ```text
//! host ──► config_soft_pwm_out oid=1 pin=25 cycle_ticks=1000 default_value=0 max_duration=5000
//! host ──► schedule_soft_pwm_out oid=1 clock=1000 value=64
//! host ◄── shutdown clock=7012 reason=Missed scheduling of next pwm event
//! ```
//!
//! Numeric parameters are unsigned decimal. Parameter order is free, but
//! every parameter of the command must be present exactly once.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod command;
pub mod line;
pub mod response;

pub use command::{Command, ParseError, COMMAND_FORMATS};
pub use line::{LineBuffer, LineError, MAX_LINE_LEN};
pub use response::Response;
