//! Hardware PWM slices
//!
//! The slice counter is divided down to the scheduler tick, so a host
//! `cycle_ticks` maps directly onto the slice's `top`. Periods longer than
//! the 16-bit counter are clamped.

use embassy_rp::pwm::{Config, Pwm};
use fixed::types::extra::U4;
use fixed::FixedU16;
use metron_hal::PwmPin;

/// Slice output a GPIO is wired to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmChannel {
    A,
    B,
}

/// One channel of a PWM slice
pub struct HwPwm {
    num: u32,
    pwm: Pwm<'static>,
    channel: PwmChannel,
    config: Config,
    duty: u8,
}

impl HwPwm {
    /// Wrap a slice already bound to GPIO `num`
    pub fn new(num: u32, pwm: Pwm<'static>, channel: PwmChannel) -> Self {
        Self {
            num,
            pwm,
            channel,
            config: Config::default(),
            duty: 0,
        }
    }

    /// GPIO number
    pub fn num(&self) -> u32 {
        self.num
    }

    /// Set the period and duty
    pub fn configure(&mut self, cycle_ticks: u32, duty: u8) {
        let divider = (embassy_rp::clocks::clk_sys_freq() as u64 / embassy_time::TICK_HZ)
            .clamp(1, 255) as u32;
        self.config.divider = FixedU16::<U4>::from_num(divider);
        self.config.top = (cycle_ticks.clamp(1, 1 << 16) - 1) as u16;
        self.write_duty(duty);
    }

    fn compare(&self) -> u16 {
        let span = self.config.top as u32 + 1;
        (span * self.duty as u32 / 255).min(u16::MAX as u32) as u16
    }
}

impl PwmPin for HwPwm {
    fn write_duty(&mut self, duty: u8) {
        self.duty = duty;
        let compare = self.compare();
        match self.channel {
            PwmChannel::A => self.config.compare_a = compare,
            PwmChannel::B => self.config.compare_b = compare,
        }
        self.pwm.set_config(&self.config);
    }

    fn duty(&self) -> u8 {
        self.duty
    }
}
