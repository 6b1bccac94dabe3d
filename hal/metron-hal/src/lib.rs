//! Metron Hardware Abstraction Layer
//!
//! This crate defines the pin-driver and clock traits the scheduled-output
//! core is written against. Chip-specific crates implement them so the same
//! controllers run on real hardware and on the host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  metron-core (controllers, scheduler)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  metron-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  metron-hal-  │       │  mock board   │
//! │    rp2040     │       │ (host tests)  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Digital output handle
//! - [`pwm::PwmPin`] - Hardware PWM output handle
//! - [`board::Board`] - Pin setup by number and the free-running clock

#![no_std]
#![deny(unsafe_code)]

pub mod board;
pub mod gpio;
pub mod pwm;

#[cfg(feature = "mock")]
pub mod mock;

// Re-export key traits at crate root for convenience
pub use board::{Board, PinError};
pub use gpio::OutputPin;
pub use pwm::PwmPin;
