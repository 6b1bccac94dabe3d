//! Hardware-PWM-out controller

use metron_hal::PwmPin;

use super::scheduled::{ScheduledOutput, ValueSink};
use crate::clock::Ticks;

/// Drives a hardware PWM channel's duty
#[derive(Debug)]
pub struct PwmDuty<P>(pub P);

impl<P: PwmPin> ValueSink for PwmDuty<P> {
    fn write_value(&mut self, value: u8) {
        self.0.write_duty(value);
    }
}

/// Scheduled hardware PWM output
pub type PwmOut<P> = ScheduledOutput<PwmDuty<P>>;

impl<P: PwmPin> ScheduledOutput<PwmDuty<P>> {
    /// Wrap a channel already set up at its default duty
    pub fn pwm(pin: P, default_value: u8, max_duration: Ticks) -> Self {
        Self::new(PwmDuty(pin), default_value, max_duration)
    }

    /// Channel handle
    pub fn channel(&self) -> &P {
        &self.sink().0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShutdownReason;
    use crate::sched::TimerAction;
    use metron_hal::mock::MockBoard;
    use metron_hal::Board;

    #[test]
    fn test_duty_follows_schedule() {
        let mut board = MockBoard::new();
        let channel = board.setup_pwm(8, 1000, 16).unwrap();
        let mut out = PwmOut::pwm(channel, 16, 2000);

        out.schedule(100, 128);
        assert_eq!(out.on_timer(), Ok(TimerAction::RescheduleAt(2100)));
        assert_eq!(out.channel().duty(), 128);
        assert_eq!(out.on_timer(), Err(ShutdownReason::MissedPinEvent));

        out.shutdown();
        assert_eq!(out.channel().duty(), 16);
    }

    #[test]
    fn test_distinct_duties_are_not_default() {
        let mut board = MockBoard::new();
        let channel = board.setup_pwm(8, 1000, 0).unwrap();
        let mut out = PwmOut::pwm(channel, 0, 10);

        out.schedule(0, 1);
        assert_eq!(out.on_timer(), Ok(TimerAction::RescheduleAt(10)));
    }
}
