//! RP2040 board
//!
//! Digital outputs come from the [`PinBank`]. Hardware PWM is only offered
//! on pins the firmware wired to a slice at startup, since embassy binds
//! slices to pins by type.

use embassy_time::Instant;
use heapless::Vec;
use metron_hal::{Board, OutputPin, PinError};

use crate::gpio::GpioOut;
use crate::pins::{PinBank, GPIO_COUNT};
use crate::pwm::HwPwm;

/// Maximum PWM channels a board may register
pub const MAX_PWM_PINS: usize = 8;

struct PwmSlot {
    num: u32,
    /// `None` once a configured output owns the channel
    pwm: Option<HwPwm>,
}

/// RP2040 implementation of [`Board`]
pub struct Rp2040Board {
    pins: PinBank,
    pwm: Vec<PwmSlot, MAX_PWM_PINS>,
    /// Handles of pins driven by `set_digital_out`, kept so they stay driven
    untracked: [Option<GpioOut>; GPIO_COUNT],
}

impl Rp2040Board {
    /// Create a board over the GPIOs in `pins`
    pub fn new(pins: PinBank) -> Self {
        Self {
            pins,
            pwm: Vec::new(),
            untracked: core::array::from_fn(|_| None),
        }
    }

    /// Offer hardware PWM on `pwm`'s pin
    pub fn add_pwm(&mut self, pwm: HwPwm) -> Result<(), PinError> {
        if self.pwm.iter().any(|slot| slot.num == pwm.num()) {
            return Err(PinError::AlreadyTaken);
        }
        self.pwm
            .push(PwmSlot {
                num: pwm.num(),
                pwm: Some(pwm),
            })
            .map_err(|_| PinError::AlreadyTaken)
    }

    fn pwm_slot(&mut self, num: u32) -> Result<&mut PwmSlot, PinError> {
        self.pwm
            .iter_mut()
            .find(|slot| slot.num == num)
            .ok_or(PinError::NotPwmCapable)
    }
}

impl Board for Rp2040Board {
    type Digital = GpioOut;
    type Pwm = HwPwm;

    fn setup_digital(&mut self, pin: u32, high: bool) -> Result<GpioOut, PinError> {
        let slot = self
            .untracked
            .get_mut(pin as usize)
            .ok_or(PinError::InvalidPin)?;
        if let Some(mut out) = slot.take() {
            out.write(high);
            return Ok(out);
        }
        let raw = self.pins.take(pin)?;
        Ok(GpioOut::new(pin, raw, high))
    }

    fn setup_pwm(&mut self, pin: u32, cycle_ticks: u32, duty: u8) -> Result<HwPwm, PinError> {
        let mut pwm = self
            .pwm_slot(pin)?
            .pwm
            .take()
            .ok_or(PinError::AlreadyTaken)?;
        pwm.configure(cycle_ticks, duty);
        Ok(pwm)
    }

    fn set_digital(&mut self, pin: u32, high: bool) -> Result<(), PinError> {
        let out = self.setup_digital(pin, high)?;
        self.untracked[pin as usize] = Some(out);
        Ok(())
    }

    fn set_pwm(&mut self, pin: u32, cycle_ticks: u32, duty: u8) -> Result<(), PinError> {
        let pwm = self
            .pwm_slot(pin)?
            .pwm
            .as_mut()
            .ok_or(PinError::AlreadyTaken)?;
        pwm.configure(cycle_ticks, duty);
        Ok(())
    }

    fn read_time(&self) -> u32 {
        Instant::now().as_ticks() as u32
    }
}
