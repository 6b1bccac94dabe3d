//! Host-to-MCU commands
//!
//! Decoding is strict: unknown names, missing, duplicated, unexpected or
//! out-of-range parameters are rejected. Decode errors are reported to the
//! caller; they never touch output state.

use core::fmt;
use core::str::SplitWhitespace;

use heapless::Vec;

/// Maximum parameters carried by any command
pub const MAX_PARAMS: usize = 5;

/// Command dictionary
///
/// `%c` is a byte, `%u` a 32-bit unsigned value.
pub const COMMAND_FORMATS: &[&str] = &[
    "config_digital_out oid=%c pin=%u default_value=%c max_duration=%u",
    "schedule_digital_out oid=%c clock=%u value=%c",
    "set_digital_out pin=%u value=%c",
    "config_pwm_out oid=%c pin=%u cycle_ticks=%u default_value=%c max_duration=%u",
    "schedule_pwm_out oid=%c clock=%u value=%c",
    "set_pwm_out pin=%u cycle_ticks=%u value=%c",
    "config_soft_pwm_out oid=%c pin=%u cycle_ticks=%u default_value=%c max_duration=%u",
    "schedule_soft_pwm_out oid=%c clock=%u value=%c",
    "get_clock",
    "get_config",
    "emergency_stop",
];

/// Errors that can occur while decoding a command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Line holds no command name
    Empty,
    /// Command name not in the dictionary
    UnknownCommand,
    /// Token is not `key=value`
    MalformedParam,
    /// Same key given twice
    DuplicateParam,
    /// More parameters than any command takes
    TooManyParams,
    /// A required parameter is absent
    MissingParam,
    /// A parameter the command does not take
    UnexpectedParam,
    /// Value is not an unsigned decimal number
    InvalidNumber,
    /// Value does not fit the parameter width
    OutOfRange,
}

/// Decoded host command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    ConfigDigitalOut {
        oid: u8,
        pin: u32,
        default_value: u8,
        max_duration: u32,
    },
    ScheduleDigitalOut {
        oid: u8,
        clock: u32,
        value: u8,
    },
    SetDigitalOut {
        pin: u32,
        value: u8,
    },
    ConfigPwmOut {
        oid: u8,
        pin: u32,
        cycle_ticks: u32,
        default_value: u8,
        max_duration: u32,
    },
    SchedulePwmOut {
        oid: u8,
        clock: u32,
        value: u8,
    },
    SetPwmOut {
        pin: u32,
        cycle_ticks: u32,
        value: u8,
    },
    ConfigSoftPwmOut {
        oid: u8,
        pin: u32,
        cycle_ticks: u32,
        default_value: u8,
        max_duration: u32,
    },
    ScheduleSoftPwmOut {
        oid: u8,
        clock: u32,
        value: u8,
    },
    /// Report the current clock
    GetClock,
    /// Report MCU configuration and shutdown state
    GetConfig,
    /// Halt immediately
    EmergencyStop,
}

/// `key=value` pairs of one line
struct Params<'a> {
    items: Vec<(&'a str, &'a str), MAX_PARAMS>,
}

impl<'a> Params<'a> {
    fn parse(tokens: SplitWhitespace<'a>) -> Result<Self, ParseError> {
        let mut items: Vec<(&'a str, &'a str), MAX_PARAMS> = Vec::new();
        for token in tokens {
            let (key, value) = token.split_once('=').ok_or(ParseError::MalformedParam)?;
            if key.is_empty() || value.is_empty() {
                return Err(ParseError::MalformedParam);
            }
            if items.iter().any(|(k, _)| *k == key) {
                return Err(ParseError::DuplicateParam);
            }
            items
                .push((key, value))
                .map_err(|_| ParseError::TooManyParams)?;
        }
        Ok(Self { items })
    }

    fn u32(&self, key: &str) -> Result<u32, ParseError> {
        let (_, value) = self
            .items
            .iter()
            .find(|(k, _)| *k == key)
            .ok_or(ParseError::MissingParam)?;
        if !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::InvalidNumber);
        }
        value.parse().map_err(|_| ParseError::OutOfRange)
    }

    fn u8(&self, key: &str) -> Result<u8, ParseError> {
        u8::try_from(self.u32(key)?).map_err(|_| ParseError::OutOfRange)
    }

    /// Reject leftovers once every expected parameter has been read
    fn finish(&self, expected: usize) -> Result<(), ParseError> {
        if self.items.len() > expected {
            return Err(ParseError::UnexpectedParam);
        }
        Ok(())
    }
}

impl Command {
    /// Decode one command line (without the trailing newline)
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let mut tokens = line.split_whitespace();
        let name = tokens.next().ok_or(ParseError::Empty)?;
        let p = Params::parse(tokens)?;

        let (command, count) = match name {
            "config_digital_out" => (
                Command::ConfigDigitalOut {
                    oid: p.u8("oid")?,
                    pin: p.u32("pin")?,
                    default_value: p.u8("default_value")?,
                    max_duration: p.u32("max_duration")?,
                },
                4,
            ),
            "schedule_digital_out" => (
                Command::ScheduleDigitalOut {
                    oid: p.u8("oid")?,
                    clock: p.u32("clock")?,
                    value: p.u8("value")?,
                },
                3,
            ),
            "set_digital_out" => (
                Command::SetDigitalOut {
                    pin: p.u32("pin")?,
                    value: p.u8("value")?,
                },
                2,
            ),
            "config_pwm_out" => (
                Command::ConfigPwmOut {
                    oid: p.u8("oid")?,
                    pin: p.u32("pin")?,
                    cycle_ticks: p.u32("cycle_ticks")?,
                    default_value: p.u8("default_value")?,
                    max_duration: p.u32("max_duration")?,
                },
                5,
            ),
            "schedule_pwm_out" => (
                Command::SchedulePwmOut {
                    oid: p.u8("oid")?,
                    clock: p.u32("clock")?,
                    value: p.u8("value")?,
                },
                3,
            ),
            "set_pwm_out" => (
                Command::SetPwmOut {
                    pin: p.u32("pin")?,
                    cycle_ticks: p.u32("cycle_ticks")?,
                    value: p.u8("value")?,
                },
                3,
            ),
            "config_soft_pwm_out" => (
                Command::ConfigSoftPwmOut {
                    oid: p.u8("oid")?,
                    pin: p.u32("pin")?,
                    cycle_ticks: p.u32("cycle_ticks")?,
                    default_value: p.u8("default_value")?,
                    max_duration: p.u32("max_duration")?,
                },
                5,
            ),
            "schedule_soft_pwm_out" => (
                Command::ScheduleSoftPwmOut {
                    oid: p.u8("oid")?,
                    clock: p.u32("clock")?,
                    value: p.u8("value")?,
                },
                3,
            ),
            "get_clock" => (Command::GetClock, 0),
            "get_config" => (Command::GetConfig, 0),
            "emergency_stop" => (Command::EmergencyStop, 0),
            _ => return Err(ParseError::UnknownCommand),
        };

        p.finish(count)?;
        Ok(command)
    }

    /// Command name as it appears on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Command::ConfigDigitalOut { .. } => "config_digital_out",
            Command::ScheduleDigitalOut { .. } => "schedule_digital_out",
            Command::SetDigitalOut { .. } => "set_digital_out",
            Command::ConfigPwmOut { .. } => "config_pwm_out",
            Command::SchedulePwmOut { .. } => "schedule_pwm_out",
            Command::SetPwmOut { .. } => "set_pwm_out",
            Command::ConfigSoftPwmOut { .. } => "config_soft_pwm_out",
            Command::ScheduleSoftPwmOut { .. } => "schedule_soft_pwm_out",
            Command::GetClock => "get_clock",
            Command::GetConfig => "get_config",
            Command::EmergencyStop => "emergency_stop",
        }
    }

    /// Check if this command is still answered after a shutdown
    pub fn is_query(&self) -> bool {
        matches!(self, Command::GetClock | Command::GetConfig)
    }
}

/// Encodes the canonical line (for host tools and tests)
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())?;
        match *self {
            Command::ConfigDigitalOut {
                oid,
                pin,
                default_value,
                max_duration,
            } => write!(
                f,
                " oid={} pin={} default_value={} max_duration={}",
                oid, pin, default_value, max_duration
            ),
            Command::ScheduleDigitalOut { oid, clock, value }
            | Command::SchedulePwmOut { oid, clock, value }
            | Command::ScheduleSoftPwmOut { oid, clock, value } => {
                write!(f, " oid={} clock={} value={}", oid, clock, value)
            }
            Command::SetDigitalOut { pin, value } => write!(f, " pin={} value={}", pin, value),
            Command::ConfigPwmOut {
                oid,
                pin,
                cycle_ticks,
                default_value,
                max_duration,
            }
            | Command::ConfigSoftPwmOut {
                oid,
                pin,
                cycle_ticks,
                default_value,
                max_duration,
            } => write!(
                f,
                " oid={} pin={} cycle_ticks={} default_value={} max_duration={}",
                oid, pin, cycle_ticks, default_value, max_duration
            ),
            Command::SetPwmOut {
                pin,
                cycle_ticks,
                value,
            } => write!(f, " pin={} cycle_ticks={} value={}", pin, cycle_ticks, value),
            Command::GetClock | Command::GetConfig | Command::EmergencyStop => Ok(()),
        }
    }
}
