//! RP2040 board support
//!
//! Implements the `metron-hal` board traits on embassy-rp:
//!
//! - Pin bank for claiming GPIOs by number
//! - GPIO digital outputs
//! - PWM slice channels divided down to the scheduler tick
//! - Board clock read from the embassy time driver

#![no_std]
#![deny(unsafe_code)]

pub mod board;
pub mod gpio;
pub mod pins;
pub mod pwm;

pub use board::{Rp2040Board, MAX_PWM_PINS};
pub use gpio::GpioOut;
pub use pins::{PinBank, GPIO_COUNT};
pub use pwm::{HwPwm, PwmChannel};
