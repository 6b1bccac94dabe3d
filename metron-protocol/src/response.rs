//! MCU-to-host responses

use core::fmt::{self, Write};

use heapless::String;

use crate::line::MAX_LINE_LEN;

/// Responses sent to the host
///
/// A `reason` always comes last and runs to the end of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response<'a> {
    /// Reply to `get_clock`
    Clock { clock: u32 },
    /// Reply to `get_config`
    Config {
        is_shutdown: bool,
        clock_freq: u32,
        oid_count: u8,
    },
    /// The MCU halted; sent once
    Shutdown { clock: u32, reason: &'a str },
    /// Reply to a command received after a halt
    IsShutdown { reason: &'a str },
}

impl Response<'_> {
    /// Encode as a newline-terminated line
    pub fn to_line(&self) -> Result<String<MAX_LINE_LEN>, fmt::Error> {
        let mut line = String::new();
        writeln!(line, "{}", self)?;
        Ok(line)
    }
}

impl fmt::Display for Response<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Response::Clock { clock } => write!(f, "clock clock={}", clock),
            Response::Config {
                is_shutdown,
                clock_freq,
                oid_count,
            } => write!(
                f,
                "config is_shutdown={} clock_freq={} oid_count={}",
                is_shutdown as u8, clock_freq, oid_count
            ),
            Response::Shutdown { clock, reason } => {
                write!(f, "shutdown clock={} reason={}", clock, reason)
            }
            Response::IsShutdown { reason } => write!(f, "is_shutdown reason={}", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_line() {
        let line = Response::Clock { clock: 4_294_967_295 }.to_line().unwrap();
        assert_eq!(line.as_str(), "clock clock=4294967295\n");
    }

    #[test]
    fn test_config_line() {
        let line = Response::Config {
            is_shutdown: true,
            clock_freq: 1_000_000,
            oid_count: 16,
        }
        .to_line()
        .unwrap();
        assert_eq!(
            line.as_str(),
            "config is_shutdown=1 clock_freq=1000000 oid_count=16\n"
        );
    }

    #[test]
    fn test_shutdown_reason_runs_to_end_of_line() {
        let line = Response::Shutdown {
            clock: 6000,
            reason: "Missed scheduling of next pwm event",
        }
        .to_line()
        .unwrap();
        assert_eq!(
            line.as_str(),
            "shutdown clock=6000 reason=Missed scheduling of next pwm event\n"
        );
    }

    #[test]
    fn test_line_overflow_is_an_error() {
        let reason = core::str::from_utf8(&[b'x'; MAX_LINE_LEN]).unwrap();
        assert!(Response::IsShutdown { reason }.to_line().is_err());
    }
}
