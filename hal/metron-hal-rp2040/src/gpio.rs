//! GPIO outputs

use embassy_rp::gpio::{AnyPin, Level, Output};
use embassy_rp::Peri;
use metron_hal::OutputPin;

/// Digital output on an RP2040 GPIO
pub struct GpioOut {
    num: u32,
    out: Output<'static>,
}

impl GpioOut {
    /// Drive `pin` as an output at `high`
    pub fn new(num: u32, pin: Peri<'static, AnyPin>, high: bool) -> Self {
        let level = if high { Level::High } else { Level::Low };
        Self {
            num,
            out: Output::new(pin, level),
        }
    }

    /// GPIO number
    pub fn num(&self) -> u32 {
        self.num
    }
}

impl OutputPin for GpioOut {
    fn set_high(&mut self) {
        self.out.set_high();
    }

    fn set_low(&mut self) {
        self.out.set_low();
    }

    fn toggle(&mut self) {
        self.out.toggle();
    }

    fn is_set_high(&self) -> bool {
        self.out.is_set_high()
    }
}
