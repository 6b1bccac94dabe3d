//! One-shot scheduled writes with a deadline guard
//!
//! Digital-out and hardware-PWM-out behave identically apart from what a
//! "value" means for the pin, so both are a [`ScheduledOutput`] over a
//! different [`ValueSink`].
//!
//! A schedule arms a `Write` at the target tick. If the written value
//! differs from the default and the record has a `max_duration`, the timer
//! turns into a `DeadlineGuard` `max_duration` ticks later. The host is
//! expected to replace it with a new schedule before it fires; if it does
//! fire, the MCU halts.

use crate::clock::Ticks;
use crate::error::ShutdownReason;
use crate::sched::{Timer, TimerAction};

/// Pin-side half of a scheduled output
///
/// Records keep the host's raw byte; only the sink interprets it.
pub trait ValueSink {
    /// Drive the pin to `value`
    fn write_value(&mut self, value: u8);
}

/// Timer callbacks of a scheduled output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputEvent {
    /// Write the scheduled value
    Write,
    /// Host missed its follow-up
    DeadlineGuard,
}

/// Scheduled-output record
#[derive(Debug)]
pub struct ScheduledOutput<S> {
    sink: S,
    default_value: u8,
    max_duration: Ticks,
    value: u8,
    timer: Timer<OutputEvent>,
}

impl<S: ValueSink> ScheduledOutput<S> {
    /// Create a record and drive the pin to `default_value`
    ///
    /// `max_duration` of zero disables the deadline guard.
    pub fn new(mut sink: S, default_value: u8, max_duration: Ticks) -> Self {
        sink.write_value(default_value);
        Self {
            sink,
            default_value,
            max_duration,
            value: default_value,
            timer: Timer::new(0, OutputEvent::Write),
        }
    }

    /// Prepare a write of `value` at `clock`
    ///
    /// Returns the tick to arm the record's timer at. The caller must
    /// disarm any earlier timer of this record first.
    pub fn schedule(&mut self, clock: Ticks, value: u8) -> Ticks {
        self.value = value;
        self.timer = Timer::new(clock, OutputEvent::Write);
        clock
    }

    /// Run the armed callback
    pub fn on_timer(&mut self) -> Result<TimerAction, ShutdownReason> {
        match self.timer.event {
            OutputEvent::Write => {
                self.sink.write_value(self.value);
                if self.value == self.default_value || self.max_duration == 0 {
                    return Ok(TimerAction::Complete);
                }
                self.timer.waketime = self.timer.waketime.wrapping_add(self.max_duration);
                self.timer.event = OutputEvent::DeadlineGuard;
                Ok(TimerAction::RescheduleAt(self.timer.waketime))
            }
            OutputEvent::DeadlineGuard => Err(ShutdownReason::MissedPinEvent),
        }
    }

    /// Force the pin back to its default
    pub fn shutdown(&mut self) {
        self.value = self.default_value;
        self.sink.write_value(self.default_value);
    }

    /// Value the pin is reset to on shutdown
    pub fn default_value(&self) -> u8 {
        self.default_value
    }

    /// Deadline after a non-default write, zero if disabled
    pub fn max_duration(&self) -> Ticks {
        self.max_duration
    }

    /// Most recently scheduled value
    pub fn value(&self) -> u8 {
        self.value
    }

    /// Current timer state
    pub fn timer(&self) -> Timer<OutputEvent> {
        self.timer
    }

    /// Pin-side sink
    pub fn sink(&self) -> &S {
        &self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        last: Option<u8>,
        writes: u32,
    }

    impl ValueSink for Recorder {
        fn write_value(&mut self, value: u8) {
            self.last = Some(value);
            self.writes += 1;
        }
    }

    #[test]
    fn test_new_writes_default() {
        let out = ScheduledOutput::new(Recorder::default(), 7, 0);
        assert_eq!(out.sink().last, Some(7));
        assert_eq!(out.value(), 7);
    }

    #[test]
    fn test_default_value_completes() {
        let mut out = ScheduledOutput::new(Recorder::default(), 0, 500);
        assert_eq!(out.schedule(100, 0), 100);
        assert_eq!(out.on_timer(), Ok(TimerAction::Complete));
    }

    #[test]
    fn test_zero_max_duration_completes() {
        let mut out = ScheduledOutput::new(Recorder::default(), 0, 0);
        out.schedule(100, 200);
        assert_eq!(out.on_timer(), Ok(TimerAction::Complete));
        assert_eq!(out.sink().last, Some(200));
    }

    #[test]
    fn test_guard_fires_after_max_duration() {
        let mut out = ScheduledOutput::new(Recorder::default(), 0, 500);
        out.schedule(100, 1);
        assert_eq!(out.on_timer(), Ok(TimerAction::RescheduleAt(600)));
        assert_eq!(out.timer().event, OutputEvent::DeadlineGuard);
        assert_eq!(out.on_timer(), Err(ShutdownReason::MissedPinEvent));
    }

    #[test]
    fn test_reschedule_replaces_guard() {
        let mut out = ScheduledOutput::new(Recorder::default(), 0, 500);
        out.schedule(100, 1);
        out.on_timer().unwrap();

        out.schedule(400, 0);
        assert_eq!(out.timer(), Timer::new(400, OutputEvent::Write));
        assert_eq!(out.on_timer(), Ok(TimerAction::Complete));
        assert_eq!(out.sink().last, Some(0));
    }

    #[test]
    fn test_guard_wraps() {
        let mut out = ScheduledOutput::new(Recorder::default(), 0, 100);
        out.schedule(u32::MAX - 10, 5);
        assert_eq!(out.on_timer(), Ok(TimerAction::RescheduleAt(89)));
    }

    #[test]
    fn test_shutdown_restores_default() {
        let mut out = ScheduledOutput::new(Recorder::default(), 3, 0);
        out.schedule(10, 9);
        out.on_timer().unwrap();
        out.shutdown();
        out.shutdown();
        assert_eq!(out.sink().last, Some(3));
        assert_eq!(out.value(), 3);
    }
}
