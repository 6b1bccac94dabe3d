//! Scheduled-output controllers
//!
//! - [`DigitalOut`]: one-shot digital write with an optional deadline guard
//! - [`PwmOut`]: the same for a hardware PWM duty
//! - [`SoftPwm`]: timer-synthesized PWM with a double-buffered program
//!
//! Each record owns its pin handle and the state of its single timer. The
//! timer queue only knows which oid to call back and when.

mod digital;
mod pwm;
mod scheduled;
mod soft_pwm;

pub use digital::{DigitalLevel, DigitalOut};
pub use pwm::{PwmDuty, PwmOut};
pub use scheduled::{OutputEvent, ScheduledOutput, ValueSink};
pub use soft_pwm::{Pending, Program, Rearm, SoftPwm, SoftPwmEvent, FULL_DUTY};

use metron_hal::Board;

use crate::error::ShutdownReason;
use crate::sched::TimerAction;

/// Controller kind of a configured oid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputKind {
    Digital,
    Pwm,
    SoftPwm,
}

/// A configured output
pub enum Output<B: Board> {
    Digital(DigitalOut<B::Digital>),
    Pwm(PwmOut<B::Pwm>),
    SoftPwm(SoftPwm<B::Digital>),
}

impl<B: Board> Output<B> {
    /// Controller kind
    pub fn kind(&self) -> OutputKind {
        match self {
            Output::Digital(_) => OutputKind::Digital,
            Output::Pwm(_) => OutputKind::Pwm,
            Output::SoftPwm(_) => OutputKind::SoftPwm,
        }
    }

    /// Run the record's armed timer callback
    pub fn on_timer(&mut self) -> Result<TimerAction, ShutdownReason> {
        match self {
            Output::Digital(out) => out.on_timer(),
            Output::Pwm(out) => out.on_timer(),
            Output::SoftPwm(out) => out.on_timer(),
        }
    }

    /// Force the pin back to its default
    pub fn shutdown(&mut self) {
        match self {
            Output::Digital(out) => out.shutdown(),
            Output::Pwm(out) => out.shutdown(),
            Output::SoftPwm(out) => out.shutdown(),
        }
    }
}
