//! Board configuration
//!
//! Capacities are compile-time constants; the board description is built
//! once at startup (the firmware generates it from `board.toml`).

use heapless::Vec;

use crate::error::ShutdownReason;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of oid slots (and therefore of timers)
pub const MAX_OIDS: usize = 16;

/// Maximum pins a board may reserve for its own peripherals
pub const MAX_RESERVED_PINS: usize = 8;

/// Errors in a board description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Clock frequency is zero
    ZeroClockFreq,
    /// Board exposes no pins
    NoPins,
    /// Reserved pin is outside the pin range
    ReservedPinOutOfRange,
    /// More reserved pins than `MAX_RESERVED_PINS`
    TooManyReservedPins,
}

/// Board description used to validate host pin numbers
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoardConfig {
    /// Clock ticks per second
    pub clock_freq: u32,
    /// Pins `0..pin_count` exist
    pub pin_count: u32,
    /// Pins the host may not drive (UART, debug probe, ...)
    pub reserved_pins: Vec<u32, MAX_RESERVED_PINS>,
}

impl BoardConfig {
    /// Create a board description with no reserved pins
    pub fn new(clock_freq: u32, pin_count: u32) -> Self {
        Self {
            clock_freq,
            pin_count,
            reserved_pins: Vec::new(),
        }
    }

    /// Build from a reserved pin list
    pub fn with_reserved(
        clock_freq: u32,
        pin_count: u32,
        reserved: &[u32],
    ) -> Result<Self, ConfigError> {
        let mut config = Self::new(clock_freq, pin_count);
        config
            .reserved_pins
            .extend_from_slice(reserved)
            .map_err(|_| ConfigError::TooManyReservedPins)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the description is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clock_freq == 0 {
            return Err(ConfigError::ZeroClockFreq);
        }
        if self.pin_count == 0 {
            return Err(ConfigError::NoPins);
        }
        if self.reserved_pins.iter().any(|&p| p >= self.pin_count) {
            return Err(ConfigError::ReservedPinOutOfRange);
        }
        Ok(())
    }

    /// Check a host-supplied pin number
    pub fn check_pin(&self, pin: u32) -> Result<(), ShutdownReason> {
        if pin >= self.pin_count || self.reserved_pins.contains(&pin) {
            return Err(ShutdownReason::InvalidPin);
        }
        Ok(())
    }
}
