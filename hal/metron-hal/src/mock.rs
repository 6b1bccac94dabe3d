//! Mock board implementation for testing
//!
//! Pin handles carry their own state so tests can inspect them through the
//! records that own them. Untracked writes (`set_*`) are recorded on the
//! board itself.

use crate::board::{Board, PinError};
use crate::gpio::OutputPin;
use crate::pwm::PwmPin;

/// Number of pins the mock board exposes
pub const MOCK_PIN_COUNT: u32 = 32;

/// Mock digital output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockPin {
    /// Pin number this handle was set up for
    pub pin: u32,
    high: bool,
    toggles: u32,
}

impl MockPin {
    /// Number of toggles since setup
    pub fn toggles(&self) -> u32 {
        self.toggles
    }
}

impl OutputPin for MockPin {
    fn set_high(&mut self) {
        self.high = true;
    }

    fn set_low(&mut self) {
        self.high = false;
    }

    fn toggle(&mut self) {
        self.high = !self.high;
        self.toggles += 1;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// Mock hardware PWM output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockPwm {
    /// Pin number this handle was set up for
    pub pin: u32,
    /// PWM period in ticks
    pub cycle_ticks: u32,
    duty: u8,
}

impl PwmPin for MockPwm {
    fn write_duty(&mut self, duty: u8) {
        self.duty = duty;
    }

    fn duty(&self) -> u8 {
        self.duty
    }
}

/// Mock board
///
/// Every pin below [`MOCK_PIN_COUNT`] is a valid digital output. Pins set
/// in the no-PWM mask refuse hardware PWM setup.
#[derive(Debug, Clone)]
pub struct MockBoard {
    time: u32,
    no_pwm_mask: u32,
    levels: [Option<bool>; MOCK_PIN_COUNT as usize],
    duties: [Option<u8>; MOCK_PIN_COUNT as usize],
}

impl Default for MockBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBoard {
    /// Create a mock board at tick 0
    pub fn new() -> Self {
        Self {
            time: 0,
            no_pwm_mask: 0,
            levels: [None; MOCK_PIN_COUNT as usize],
            duties: [None; MOCK_PIN_COUNT as usize],
        }
    }

    /// Refuse hardware PWM on `pin`
    pub fn without_pwm(mut self, pin: u32) -> Self {
        if pin < MOCK_PIN_COUNT {
            self.no_pwm_mask |= 1 << pin;
        }
        self
    }

    /// Set the current tick
    pub fn set_time(&mut self, time: u32) {
        self.time = time;
    }

    /// Level last written to an untracked pin with `set_digital`
    pub fn level(&self, pin: u32) -> Option<bool> {
        self.levels.get(pin as usize).copied().flatten()
    }

    /// Duty last written to an untracked pin with `set_pwm`
    pub fn duty(&self, pin: u32) -> Option<u8> {
        self.duties.get(pin as usize).copied().flatten()
    }

    fn check_pin(pin: u32) -> Result<(), PinError> {
        if pin >= MOCK_PIN_COUNT {
            return Err(PinError::InvalidPin);
        }
        Ok(())
    }
}

impl Board for MockBoard {
    type Digital = MockPin;
    type Pwm = MockPwm;

    fn setup_digital(&mut self, pin: u32, high: bool) -> Result<MockPin, PinError> {
        Self::check_pin(pin)?;
        Ok(MockPin {
            pin,
            high,
            toggles: 0,
        })
    }

    fn setup_pwm(&mut self, pin: u32, cycle_ticks: u32, duty: u8) -> Result<MockPwm, PinError> {
        Self::check_pin(pin)?;
        if self.no_pwm_mask & (1 << pin) != 0 {
            return Err(PinError::NotPwmCapable);
        }
        Ok(MockPwm {
            pin,
            cycle_ticks,
            duty,
        })
    }

    fn set_digital(&mut self, pin: u32, high: bool) -> Result<(), PinError> {
        Self::check_pin(pin)?;
        self.levels[pin as usize] = Some(high);
        Ok(())
    }

    fn set_pwm(&mut self, pin: u32, cycle_ticks: u32, duty: u8) -> Result<(), PinError> {
        self.setup_pwm(pin, cycle_ticks, duty)?;
        self.duties[pin as usize] = Some(duty);
        Ok(())
    }

    fn read_time(&self) -> u32 {
        self.time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_rejects_out_of_range_pin() {
        let mut board = MockBoard::new();
        assert_eq!(
            board.setup_digital(MOCK_PIN_COUNT, false),
            Err(PinError::InvalidPin)
        );
        assert!(board.setup_digital(3, true).unwrap().is_set_high());
    }

    #[test]
    fn test_pwm_mask() {
        let mut board = MockBoard::new().without_pwm(4);
        assert_eq!(board.setup_pwm(4, 100, 0), Err(PinError::NotPwmCapable));
        assert_eq!(board.setup_pwm(5, 100, 7).unwrap().duty(), 7);
    }

    #[test]
    fn test_untracked_writes_are_recorded() {
        let mut board = MockBoard::new();
        assert_eq!(board.level(2), None);
        board.set_digital(2, true).unwrap();
        board.set_pwm(6, 1000, 128).unwrap();
        assert_eq!(board.level(2), Some(true));
        assert_eq!(board.duty(6), Some(128));
    }

    #[test]
    fn test_toggle_counts() {
        let mut board = MockBoard::new();
        let mut pin = board.setup_digital(1, false).unwrap();
        pin.toggle();
        pin.toggle();
        assert!(!pin.is_set_high());
        assert_eq!(pin.toggles(), 2);
    }
}
