//! Software PWM controller
//!
//! Synthesizes a duty cycle by toggling a digital pin from its own timer.
//! Parameters are double-buffered: a schedule only stores a [`Pending`]
//! program and an end time, and the `Load` callback running at that end
//! time is the single point where the pending program becomes current.
//!
//! ```text
//!   schedule(t, v)            Load @ t                Toggle ...
//!  ───────────────┐      ┌───────────────────┐      ┌──────────────┐
//!  pending = v    │ ───► │ current = pending │ ───► │ flip pin     │
//!  end_time = t   │      │ end_time += max   │      │ stop at end  │
//!  ───────────────┘      └───────────────────┘      └──────┬───────┘
//!                                 ▲                        │
//!                                 └──── wake == end_time ──┘
//! ```
//!
//! Duty values 0 and 255 are steady levels. Anything else toggles with
//! `pulse_time = cycle_time / 255` (integer division) per duty step.

use metron_hal::OutputPin;

use crate::clock::{is_before, Ticks};
use crate::error::ShutdownReason;
use crate::sched::{Timer, TimerAction};

/// Duty value meaning "always on"
pub const FULL_DUTY: u8 = 255;

/// Pin state a soft-PWM record is running or about to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Program {
    /// Pin level
    pub is_on: bool,
    /// Toggle callback is active
    pub is_toggling: bool,
    /// Stop at `end_time` and expect a follow-up
    pub has_deadline: bool,
}

impl Program {
    /// Non-toggling program at `is_on` with no deadline
    pub const fn steady(is_on: bool) -> Self {
        Self {
            is_on,
            is_toggling: false,
            has_deadline: false,
        }
    }
}

/// Program waiting for the next `Load`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pending {
    pub program: Program,
    pub on_duration: Ticks,
    pub off_duration: Ticks,
}

/// Timer callbacks of a soft-PWM record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SoftPwmEvent {
    /// Flip the pin and step to the next edge
    Toggle,
    /// Apply the pending program
    Load,
}

/// What a schedule needs from the timer queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rearm {
    /// Leave the armed toggle step alone
    Keep,
    /// Disarm and arm the `Load` callback at this tick
    LoadAt(Ticks),
}

/// Soft-PWM record
#[derive(Debug)]
pub struct SoftPwm<P> {
    pin: P,
    default_value: bool,
    max_duration: Ticks,
    cycle_time: Ticks,
    pulse_time: Ticks,
    on_duration: Ticks,
    off_duration: Ticks,
    end_time: Ticks,
    current: Program,
    pending: Option<Pending>,
    timer: Timer<SoftPwmEvent>,
}

impl<P: OutputPin> SoftPwm<P> {
    /// Create a record and drive the pin to its default level
    pub fn new(mut pin: P, cycle_time: Ticks, default_value: u8, max_duration: Ticks) -> Self {
        let default_value = default_value != 0;
        pin.write(default_value);
        Self {
            pin,
            default_value,
            max_duration,
            cycle_time,
            pulse_time: cycle_time / FULL_DUTY as Ticks,
            on_duration: 0,
            off_duration: 0,
            end_time: 0,
            current: Program::steady(default_value),
            pending: None,
            timer: Timer::new(0, SoftPwmEvent::Load),
        }
    }

    /// Program and durations a duty value maps to
    pub fn next_program(&self, value: u8) -> Pending {
        if value == 0 || value == FULL_DUTY {
            let is_on = value == FULL_DUTY;
            return Pending {
                program: Program {
                    is_on,
                    is_toggling: false,
                    has_deadline: is_on != self.default_value && self.max_duration != 0,
                },
                on_duration: 0,
                off_duration: 0,
            };
        }

        let on_duration = self.pulse_time * value as Ticks;
        Pending {
            program: Program {
                is_on: true,
                is_toggling: true,
                has_deadline: self.max_duration != 0,
            },
            on_duration,
            off_duration: self.cycle_time - on_duration,
        }
    }

    /// Queue duty `value` to start at `time`
    ///
    /// Must run with the timer callback excluded. Fails if the current
    /// program's end time lies after `time`.
    pub fn schedule(&mut self, time: Ticks, value: u8) -> Result<Rearm, ShutdownReason> {
        let pending = self.next_program(value);

        if self.current.has_deadline && is_before(time, self.end_time) {
            return Err(ShutdownReason::SoftPwmOverlap);
        }
        self.end_time = time;
        self.pending = Some(pending);
        self.current.has_deadline = true;

        // A toggle step still due before `time` reaches end_time on its own.
        // Once it has turned into a Load at the old end time it must move.
        if self.current.is_toggling
            && self.timer.event == SoftPwmEvent::Toggle
            && is_before(self.timer.waketime, time)
        {
            return Ok(Rearm::Keep);
        }

        self.timer = Timer::new(time, SoftPwmEvent::Load);
        Ok(Rearm::LoadAt(time))
    }

    /// Run the armed callback
    pub fn on_timer(&mut self) -> Result<TimerAction, ShutdownReason> {
        match self.timer.event {
            SoftPwmEvent::Toggle => Ok(self.toggle_step()),
            SoftPwmEvent::Load => self.load_step(),
        }
    }

    fn toggle_step(&mut self) -> TimerAction {
        self.pin.toggle();
        self.current.is_on = !self.current.is_on;

        let step = if self.current.is_on {
            self.on_duration
        } else {
            self.off_duration
        };
        let mut waketime = self.timer.waketime.wrapping_add(step);
        if self.current.has_deadline && !is_before(waketime, self.end_time) {
            waketime = self.end_time;
            self.timer.event = SoftPwmEvent::Load;
        }
        self.timer.waketime = waketime;
        TimerAction::RescheduleAt(waketime)
    }

    fn load_step(&mut self) -> Result<TimerAction, ShutdownReason> {
        let pending = self.pending.take().ok_or(ShutdownReason::MissedPwmEvent)?;
        self.current = pending.program;
        self.pin.write(self.current.is_on);

        if !self.current.is_toggling {
            if !self.current.has_deadline {
                return Ok(TimerAction::Complete);
            }
            self.end_time = self.end_time.wrapping_add(self.max_duration);
            self.timer = Timer::new(self.end_time, SoftPwmEvent::Load);
            return Ok(TimerAction::RescheduleAt(self.end_time));
        }

        self.on_duration = pending.on_duration;
        self.off_duration = pending.off_duration;
        let waketime = self.end_time.wrapping_add(self.on_duration);
        self.end_time = self.end_time.wrapping_add(self.max_duration);
        self.timer = Timer::new(waketime, SoftPwmEvent::Toggle);
        Ok(TimerAction::RescheduleAt(waketime))
    }

    /// Force the pin to its default and forget any pending program
    pub fn shutdown(&mut self) {
        self.pin.write(self.default_value);
        self.current = Program::steady(self.default_value);
        self.pending = None;
    }

    pub fn pin(&self) -> &P {
        &self.pin
    }

    pub fn default_value(&self) -> bool {
        self.default_value
    }

    pub fn max_duration(&self) -> Ticks {
        self.max_duration
    }

    pub fn cycle_time(&self) -> Ticks {
        self.cycle_time
    }

    /// Ticks per duty step
    pub fn pulse_time(&self) -> Ticks {
        self.pulse_time
    }

    pub fn on_duration(&self) -> Ticks {
        self.on_duration
    }

    pub fn off_duration(&self) -> Ticks {
        self.off_duration
    }

    /// Tick the current program expires at
    pub fn end_time(&self) -> Ticks {
        self.end_time
    }

    pub fn current(&self) -> Program {
        self.current
    }

    pub fn pending(&self) -> Option<Pending> {
        self.pending
    }

    pub fn timer(&self) -> Timer<SoftPwmEvent> {
        self.timer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metron_hal::mock::{MockBoard, MockPin};
    use metron_hal::Board;
    use proptest::prelude::*;

    fn soft_pwm(cycle: Ticks, default_value: u8, max_duration: Ticks) -> SoftPwm<MockPin> {
        let mut board = MockBoard::new();
        let pin = board.setup_digital(3, default_value != 0).unwrap();
        SoftPwm::new(pin, cycle, default_value, max_duration)
    }

    /// Run the armed callback, expecting a reschedule
    fn step(pwm: &mut SoftPwm<MockPin>) -> Ticks {
        match pwm.on_timer() {
            Ok(TimerAction::RescheduleAt(t)) => t,
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_duty_mapping() {
        let pwm = soft_pwm(2550, 0, 0);
        assert_eq!(pwm.pulse_time(), 10);

        let half = pwm.next_program(128);
        assert_eq!(half.on_duration, 1280);
        assert_eq!(half.off_duration, 1270);
        assert!(half.program.is_toggling);

        for value in [0, 255] {
            let steady = pwm.next_program(value);
            assert_eq!(steady.on_duration, 0);
            assert_eq!(steady.off_duration, 0);
            assert!(!steady.program.is_toggling);
            assert_eq!(steady.program.is_on, value == 255);
        }
    }

    #[test]
    fn test_pulse_time_truncates() {
        let pwm = soft_pwm(1000, 0, 0);
        assert_eq!(pwm.pulse_time(), 3);
        let pending = pwm.next_program(64);
        assert_eq!(pending.on_duration, 192);
        assert_eq!(pending.off_duration, 808);
    }

    #[test]
    fn test_steady_deadline_only_away_from_default() {
        let pwm = soft_pwm(1000, 0, 5000);
        assert!(!pwm.next_program(0).program.has_deadline);
        assert!(pwm.next_program(255).program.has_deadline);

        let unguarded = soft_pwm(1000, 0, 0);
        assert!(!unguarded.next_program(255).program.has_deadline);
        assert!(!unguarded.next_program(100).program.has_deadline);
    }

    #[test]
    fn test_first_program_load_and_toggle() {
        let mut pwm = soft_pwm(1000, 0, 5000);
        assert_eq!(pwm.schedule(1000, 64), Ok(Rearm::LoadAt(1000)));
        assert!(!pwm.pin().is_set_high());

        // Load at 1000: pin high, first edge one on-duration later
        assert_eq!(step(&mut pwm), 1192);
        assert!(pwm.pin().is_set_high());
        assert_eq!(pwm.on_duration(), 192);
        assert_eq!(pwm.off_duration(), 808);
        assert_eq!(pwm.end_time(), 6000);
        assert_eq!(pwm.timer().event, SoftPwmEvent::Toggle);

        assert_eq!(step(&mut pwm), 2000);
        assert!(!pwm.pin().is_set_high());
    }

    #[test]
    fn test_toggle_stops_exactly_at_end_time() {
        let mut pwm = soft_pwm(1000, 0, 2500);
        pwm.schedule(0, 128).unwrap();
        step(&mut pwm); // load
        let on = pwm.on_duration();

        assert_eq!(step(&mut pwm), 1000); // off at on
        assert_eq!(step(&mut pwm), 1000 + on); // on at 1000
        assert_eq!(step(&mut pwm), 2000); // off
        assert_eq!(step(&mut pwm), 2000 + on); // on
        // next rising edge would be 3000, past the deadline
        assert_eq!(step(&mut pwm), 2500);
        assert_eq!(pwm.timer().event, SoftPwmEvent::Load);

        // nothing pending at end_time
        assert_eq!(pwm.on_timer(), Err(ShutdownReason::MissedPwmEvent));
    }

    #[test]
    fn test_follow_up_keeps_running_toggle() {
        let mut pwm = soft_pwm(1000, 0, 5000);
        pwm.schedule(0, 128).unwrap();
        step(&mut pwm);

        // Host follows up at the deadline while the toggle is armed earlier
        assert_eq!(pwm.schedule(5000, 255), Ok(Rearm::Keep));
        assert_eq!(pwm.pending().map(|p| p.program.is_on), Some(true));

        let mut waketime = pwm.timer().waketime;
        while pwm.timer().event == SoftPwmEvent::Toggle {
            waketime = step(&mut pwm);
        }
        assert_eq!(waketime, 5000);

        // Steady-on with a deadline is guarded
        assert_eq!(step(&mut pwm), 10000);
        assert!(pwm.pin().is_set_high());
        assert!(!pwm.current().is_toggling);
        assert_eq!(pwm.on_timer(), Err(ShutdownReason::MissedPwmEvent));
    }

    #[test]
    fn test_follow_up_after_toggling_stopped_moves_load() {
        let mut pwm = soft_pwm(1000, 0, 3000);
        pwm.schedule(0, 128).unwrap();
        step(&mut pwm);
        while pwm.timer().event == SoftPwmEvent::Toggle {
            step(&mut pwm);
        }
        assert_eq!(pwm.timer().waketime, 3000);
        assert!(!pwm.pin().is_set_high());

        // Follow-up starts after the old end time
        assert_eq!(pwm.schedule(3500, 255), Ok(Rearm::LoadAt(3500)));
        assert_eq!(pwm.timer(), Timer::new(3500, SoftPwmEvent::Load));
        assert!(!pwm.pin().is_set_high());
        assert!(pwm.pending().is_some());

        assert_eq!(step(&mut pwm), 6500);
        assert!(pwm.pin().is_set_high());
        assert_eq!(pwm.pending(), None);
    }

    #[test]
    fn test_overlapping_schedule_is_fatal() {
        let mut pwm = soft_pwm(1000, 0, 5000);
        pwm.schedule(1000, 64).unwrap();
        assert_eq!(pwm.schedule(999, 10), Err(ShutdownReason::SoftPwmOverlap));
    }

    #[test]
    fn test_schedule_at_end_time_is_accepted() {
        let mut pwm = soft_pwm(1000, 0, 5000);
        pwm.schedule(1000, 64).unwrap();
        assert_eq!(pwm.schedule(1000, 10), Ok(Rearm::LoadAt(1000)));
        assert_eq!(pwm.schedule(1500, 0), Ok(Rearm::LoadAt(1500)));
    }

    #[test]
    fn test_steady_default_completes() {
        let mut pwm = soft_pwm(1000, 1, 5000);
        pwm.schedule(10, 255).unwrap();
        assert_eq!(pwm.on_timer(), Ok(TimerAction::Complete));
        assert!(pwm.pin().is_set_high());
        assert!(!pwm.current().has_deadline);
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let mut pwm = soft_pwm(1000, 0, 5000);
        pwm.schedule(0, 100).unwrap();
        step(&mut pwm);
        step(&mut pwm);
        pwm.schedule(5000, 20).unwrap();

        pwm.shutdown();
        let level = pwm.pin().is_set_high();
        let current = pwm.current();
        let pending = pwm.pending();

        pwm.shutdown();
        assert_eq!(pwm.pin().is_set_high(), level);
        assert_eq!(pwm.current(), current);
        assert_eq!(pwm.pending(), pending);
        assert!(!level);
        assert_eq!(current, Program::steady(false));
        assert_eq!(pending, None);
    }

    proptest! {
        #[test]
        fn test_durations_fill_cycle(cycle in 255u32..1_000_000, value in 1u8..255) {
            let pwm = soft_pwm(cycle, 0, 0);
            let pending = pwm.next_program(value);
            prop_assert_eq!(pending.on_duration + pending.off_duration, cycle);
            prop_assert_eq!(pending.on_duration, (cycle / 255) * value as u32);
        }

        #[test]
        fn test_toggle_edges(
            start in any::<u32>(),
            cycle in 510u32..100_000,
            value in 1u8..255,
            cycles in 1u32..6,
        ) {
            let max_duration = cycle * cycles + cycle / 2;
            let mut pwm = soft_pwm(cycle, 0, max_duration);
            pwm.schedule(start, value).unwrap();

            let t0 = start;
            let first_edge = step(&mut pwm);
            prop_assert_eq!(first_edge, t0.wrapping_add(pwm.on_duration()));
            prop_assert!(pwm.pin().is_set_high());

            let (a, b) = (pwm.on_duration(), pwm.off_duration());
            let end_time = pwm.end_time();
            let mut edge = t0;
            let mut high = true;
            loop {
                let expected = edge.wrapping_add(if high { a } else { b });
                let waketime = pwm.timer().waketime;
                if pwm.timer().event == SoftPwmEvent::Load {
                    prop_assert_eq!(waketime, end_time);
                    prop_assert!(!is_before(expected, end_time));
                    break;
                }
                prop_assert_eq!(waketime, expected);
                step(&mut pwm);
                high = !high;
                edge = expected;
                prop_assert_eq!(pwm.pin().is_set_high(), high);
            }
        }
    }
}
