//! Board-agnostic core of the scheduled-output firmware
//!
//! This crate turns decoded host commands into timed pin changes:
//!
//! - Tick arithmetic with wraparound comparison
//! - Timer queue keyed by absolute wake time
//! - Oid registry holding one record per configured output
//! - Digital-out, hardware-PWM-out and soft-PWM-out controllers
//! - `Mcu` dispatcher owning the halt path and the shutdown sweep
//! - `SharedMcu` wrapper for access from task and timer context

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod clock;
pub mod config;
pub mod error;
pub mod mcu;
pub mod output;
pub mod registry;
pub mod sched;
pub mod shared;

pub use clock::{is_before, Ticks};
pub use config::{BoardConfig, ConfigError, MAX_OIDS};
pub use error::ShutdownReason;
pub use mcu::{Mcu, McuState};
pub use shared::SharedMcu;
