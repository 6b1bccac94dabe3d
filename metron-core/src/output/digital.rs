//! Digital-out controller

use metron_hal::OutputPin;

use super::scheduled::{ScheduledOutput, ValueSink};
use crate::clock::Ticks;

/// Drives a digital pin from a host value (nonzero = high)
#[derive(Debug)]
pub struct DigitalLevel<P>(pub P);

impl<P: OutputPin> ValueSink for DigitalLevel<P> {
    fn write_value(&mut self, value: u8) {
        self.0.write(value != 0);
    }
}

/// Scheduled digital output
pub type DigitalOut<P> = ScheduledOutput<DigitalLevel<P>>;

impl<P: OutputPin> ScheduledOutput<DigitalLevel<P>> {
    /// Wrap a pin already set up at its default level
    pub fn digital(pin: P, default_value: u8, max_duration: Ticks) -> Self {
        Self::new(DigitalLevel(pin), default_value, max_duration)
    }

    /// Pin handle
    pub fn pin(&self) -> &P {
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
    fn test_raw_value_compared_to_default() {
        let mut board = MockBoard::new();
        let pin = board.setup_digital(4, true).unwrap();
        let mut out = DigitalOut::digital(pin, 1, 500);
        assert_eq!(out.default_value(), 1);

        // 2 drives the same level as 1 but is not the default byte
        out.schedule(100, 2);
        assert_eq!(out.on_timer(), Ok(TimerAction::RescheduleAt(600)));
        assert!(out.pin().is_set_high());
        assert_eq!(out.on_timer(), Err(ShutdownReason::MissedPinEvent));
    }

    #[test]
    fn test_default_byte_completes() {
        let mut board = MockBoard::new();
        let pin = board.setup_digital(4, true).unwrap();
        let mut out = DigitalOut::digital(pin, 200, 1000);

        out.schedule(50, 200);
        assert_eq!(out.on_timer(), Ok(TimerAction::Complete));
        assert!(out.pin().is_set_high());
    }

    #[test]
    fn test_high_then_shutdown() {
        let mut board = MockBoard::new();
        let pin = board.setup_digital(2, false).unwrap();
        let mut out = DigitalOut::digital(pin, 0, 0);

        out.schedule(1234, 1);
        assert_eq!(out.on_timer(), Ok(TimerAction::Complete));
        assert!(out.pin().is_set_high());

        out.shutdown();
        assert!(!out.pin().is_set_high());
    }
}
