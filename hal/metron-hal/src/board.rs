//! Board abstraction
//!
//! A board hands out pin handles by number (the host addresses pins by
//! number in its config commands) and exposes the free-running tick counter
//! all schedules are expressed in.

use crate::gpio::OutputPin;
use crate::pwm::PwmPin;

/// Error when setting up a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range for this chip
    InvalidPin,
    /// Pin already owned by another output
    AlreadyTaken,
    /// Pin cannot be driven by a hardware PWM channel
    NotPwmCapable,
}

/// Chip-level pin drivers and clock
pub trait Board {
    /// Digital output handle
    type Digital: OutputPin;

    /// Hardware PWM output handle
    type Pwm: PwmPin;

    /// Configure `pin` as a digital output driven to `high`
    fn setup_digital(&mut self, pin: u32, high: bool) -> Result<Self::Digital, PinError>;

    /// Configure `pin` as a hardware PWM output
    ///
    /// `cycle_ticks` is the PWM period in clock ticks, `duty` the initial
    /// duty on the 0-255 scale.
    fn setup_pwm(&mut self, pin: u32, cycle_ticks: u32, duty: u8)
        -> Result<Self::Pwm, PinError>;

    /// Drive a pin that is not tracked by any scheduled output
    ///
    /// Boards whose handles release the pin on drop must keep the handle
    /// alive themselves.
    fn set_digital(&mut self, pin: u32, high: bool) -> Result<(), PinError> {
        self.setup_digital(pin, high).map(|_| ())
    }

    /// Configure an untracked hardware PWM output
    fn set_pwm(&mut self, pin: u32, cycle_ticks: u32, duty: u8) -> Result<(), PinError> {
        self.setup_pwm(pin, cycle_ticks, duty).map(|_| ())
    }

    /// Read the free-running 32-bit tick counter
    fn read_time(&self) -> u32;
}
