//! Command and timer dispatcher
//!
//! `Mcu` owns the board, the oid registry and the timer queue. Host
//! commands come in through [`Mcu::handle`], due timers are run by
//! [`Mcu::run_timers`]. Every failure is a [`ShutdownReason`] bubbling up
//! to [`Mcu::shutdown`], which sweeps all outputs back to their defaults
//! and stops accepting commands.
//!
//! ```text
//!  Running ──── fatal error ────► Shutdown { reason, clock }
//!     │                              │
//!     └─ config/schedule/set         └─ is_shutdown reply
//!        get_clock/get_config           get_clock/get_config
//! ```

use metron_hal::Board;
use metron_protocol::{Command, Response};

use crate::clock::{is_before, Ticks};
use crate::config::{BoardConfig, MAX_OIDS};
use crate::error::ShutdownReason;
use crate::output::{DigitalOut, Output, PwmOut, Rearm, SoftPwm};
use crate::registry::Oids;
use crate::sched::{TimerAction, TimerQueue, TIMER_REPEAT_LIMIT};

/// Run state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum McuState {
    /// Accepting commands
    Running,
    /// Halted; only queries are answered
    Shutdown {
        /// First fatal condition
        reason: ShutdownReason,
        /// Tick the halt happened at
        clock: Ticks,
    },
}

/// Scheduled-output MCU
pub struct Mcu<B: Board, const N: usize = MAX_OIDS> {
    board: B,
    config: BoardConfig,
    oids: Oids<B, N>,
    timers: TimerQueue<N>,
    state: McuState,
}

impl<B: Board, const N: usize> Mcu<B, N> {
    /// Oid slots, as reported by `get_config`
    ///
    /// Oids are bytes on the wire, so more than 255 slots fail to build.
    pub const OID_COUNT: u8 = {
        assert!(N <= u8::MAX as usize, "oid count must fit in a byte");
        N as u8
    };

    /// Create a running MCU with no outputs configured
    pub fn new(board: B, config: BoardConfig) -> Self {
        Self {
            board,
            config,
            oids: Oids::new(),
            timers: TimerQueue::new(),
            state: McuState::Running,
        }
    }

    /// Handle one host command
    ///
    /// Returns the reply, if the command has one. A command that causes a
    /// halt replies with the shutdown notice.
    pub fn handle(&mut self, cmd: &Command) -> Option<Response<'static>> {
        if let McuState::Shutdown { reason, .. } = self.state {
            if !cmd.is_query() {
                return Some(Response::IsShutdown {
                    reason: reason.as_str(),
                });
            }
        }

        match *cmd {
            Command::GetClock => Some(Response::Clock {
                clock: self.board.read_time(),
            }),
            Command::GetConfig => Some(Response::Config {
                is_shutdown: self.is_shutdown(),
                clock_freq: self.config.clock_freq,
                oid_count: Self::OID_COUNT,
            }),
            _ => match self.execute(cmd) {
                Ok(()) => None,
                Err(reason) => Some(self.shutdown(reason)),
            },
        }
    }

    fn execute(&mut self, cmd: &Command) -> Result<(), ShutdownReason> {
        match *cmd {
            Command::ConfigDigitalOut {
                oid,
                pin,
                default_value,
                max_duration,
            } => {
                self.config.check_pin(pin)?;
                self.oids.check_vacant(oid)?;
                let handle = self.board.setup_digital(pin, default_value != 0)?;
                let out = DigitalOut::digital(handle, default_value, max_duration);
                self.oids.insert(oid, Output::Digital(out))
            }
            Command::ScheduleDigitalOut { oid, clock, value } => {
                let waketime = self.oids.digital_out(oid)?.schedule(clock, value);
                self.rearm(oid, waketime)
            }
            Command::SetDigitalOut { pin, value } => {
                self.config.check_pin(pin)?;
                Ok(self.board.set_digital(pin, value != 0)?)
            }
            Command::ConfigPwmOut {
                oid,
                pin,
                cycle_ticks,
                default_value,
                max_duration,
            } => {
                self.config.check_pin(pin)?;
                self.oids.check_vacant(oid)?;
                let handle = self.board.setup_pwm(pin, cycle_ticks, default_value)?;
                let out = PwmOut::pwm(handle, default_value, max_duration);
                self.oids.insert(oid, Output::Pwm(out))
            }
            Command::SchedulePwmOut { oid, clock, value } => {
                let waketime = self.oids.pwm_out(oid)?.schedule(clock, value);
                self.rearm(oid, waketime)
            }
            Command::SetPwmOut {
                pin,
                cycle_ticks,
                value,
            } => {
                self.config.check_pin(pin)?;
                Ok(self.board.set_pwm(pin, cycle_ticks, value)?)
            }
            Command::ConfigSoftPwmOut {
                oid,
                pin,
                cycle_ticks,
                default_value,
                max_duration,
            } => {
                self.config.check_pin(pin)?;
                self.oids.check_vacant(oid)?;
                let handle = self.board.setup_digital(pin, default_value != 0)?;
                let out = SoftPwm::new(handle, cycle_ticks, default_value, max_duration);
                self.oids.insert(oid, Output::SoftPwm(out))
            }
            Command::ScheduleSoftPwmOut { oid, clock, value } => {
                match self.oids.soft_pwm(oid)?.schedule(clock, value)? {
                    Rearm::Keep => Ok(()),
                    Rearm::LoadAt(waketime) => self.rearm(oid, waketime),
                }
            }
            Command::EmergencyStop => Err(ShutdownReason::CommandRequest),
            Command::GetClock | Command::GetConfig => Ok(()),
        }
    }

    /// Replace any armed timer of `oid` with one at `waketime`
    fn rearm(&mut self, oid: u8, waketime: Ticks) -> Result<(), ShutdownReason> {
        self.timers.remove(oid);
        self.timers.add(oid, waketime)
    }

    /// Run every timer due at `now`
    ///
    /// Returns the shutdown notice if a callback halted the MCU.
    pub fn run_timers(&mut self, now: Ticks) -> Option<Response<'static>> {
        if self.is_shutdown() {
            return None;
        }
        match self.dispatch(now) {
            Ok(()) => None,
            Err(reason) => Some(self.shutdown(reason)),
        }
    }

    fn dispatch(&mut self, now: Ticks) -> Result<(), ShutdownReason> {
        for _ in 0..TIMER_REPEAT_LIMIT {
            let Some((oid, _)) = self.timers.pop_due(now) else {
                return Ok(());
            };
            match self.oids.on_timer(oid)? {
                TimerAction::Complete => {}
                TimerAction::RescheduleAt(waketime) => self.timers.add(oid, waketime)?,
            }
        }

        match self.timers.next_waketime() {
            Some(waketime) if !is_before(now, waketime) => Err(ShutdownReason::TimerTooClose),
            _ => Ok(()),
        }
    }

    /// Halt: sweep every output to its default and disarm all timers
    ///
    /// A second halt repeats the sweep but keeps the first reason.
    pub fn shutdown(&mut self, reason: ShutdownReason) -> Response<'static> {
        self.oids.shutdown_all();
        self.timers.clear();

        let (reason, clock) = match self.state {
            McuState::Shutdown { reason, clock } => (reason, clock),
            McuState::Running => {
                let clock = self.board.read_time();
                self.state = McuState::Shutdown { reason, clock };
                (reason, clock)
            }
        };
        Response::Shutdown {
            clock,
            reason: reason.as_str(),
        }
    }

    /// Earliest armed wake time
    pub fn next_waketime(&self) -> Option<Ticks> {
        self.timers.next_waketime()
    }

    /// Current tick of the board clock
    pub fn now(&self) -> Ticks {
        self.board.read_time()
    }

    pub fn state(&self) -> McuState {
        self.state
    }

    pub fn is_shutdown(&self) -> bool {
        matches!(self.state, McuState::Shutdown { .. })
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn oids(&self) -> &Oids<B, N> {
        &self.oids
    }

    pub fn timers(&self) -> &TimerQueue<N> {
        &self.timers
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }
}
