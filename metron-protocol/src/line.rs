//! Line assembly for the command stream
//!
//! Bytes arrive from the UART in arbitrary chunks. `LineBuffer` collects
//! them until a `\n` and hands back the complete line. `\r` is dropped so
//! both `\n` and `\r\n` terminators work.

use heapless::String;

/// Maximum length of a command or response line (excluding terminator)
pub const MAX_LINE_LEN: usize = 128;

/// Errors that can occur while assembling a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Line exceeded `MAX_LINE_LEN`; the rest of it is discarded
    TooLong,
    /// Line contains bytes that are not printable ASCII
    InvalidByte,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineState {
    /// Collecting bytes
    Collecting,
    /// Last byte completed a line still held in the buffer
    Complete,
    /// Dropping bytes until the next terminator
    Discarding(LineError),
}

/// Incremental line assembler
#[derive(Debug, Clone)]
pub struct LineBuffer {
    state: LineState,
    buffer: String<MAX_LINE_LEN>,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineBuffer {
    /// Create an empty line buffer
    pub fn new() -> Self {
        Self {
            state: LineState::Collecting,
            buffer: String::new(),
        }
    }

    /// Reset to an empty buffer
    pub fn reset(&mut self) {
        self.state = LineState::Collecting;
        self.buffer.clear();
    }

    /// Feed a single byte
    ///
    /// Returns `Ok(Some(line))` when a terminator completes a non-empty
    /// line, `Ok(None)` when more bytes are needed, and `Err` once per
    /// rejected line, when its terminator arrives. The returned line stays
    /// valid until the next call.
    pub fn feed(&mut self, byte: u8) -> Result<Option<&str>, LineError> {
        if self.state == LineState::Complete {
            self.reset();
        }

        match (self.state, byte) {
            (LineState::Discarding(err), b'\n') => {
                self.reset();
                Err(err)
            }
            (LineState::Discarding(_), _) => Ok(None),
            (_, b'\n') => {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                self.state = LineState::Complete;
                Ok(Some(self.buffer.as_str()))
            }
            (_, b'\r') => Ok(None),
            (_, b) if b == b' ' || b == b'\t' || b.is_ascii_graphic() => {
                if self.buffer.push(b as char).is_err() {
                    self.buffer.clear();
                    self.state = LineState::Discarding(LineError::TooLong);
                }
                Ok(None)
            }
            _ => {
                self.buffer.clear();
                self.state = LineState::Discarding(LineError::InvalidByte);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feed bytes and collect every completed line length
    fn feed_all(buf: &mut LineBuffer, bytes: &[u8]) -> heapless::Vec<Result<usize, LineError>, 8> {
        let mut out = heapless::Vec::new();
        for &b in bytes {
            match buf.feed(b) {
                Ok(Some(line)) => out.push(Ok(line.len())).unwrap(),
                Ok(None) => {}
                Err(e) => out.push(Err(e)).unwrap(),
            }
        }
        out
    }

    #[test]
    fn test_single_line() {
        let mut buf = LineBuffer::new();
        for &b in b"get_clock" {
            assert_eq!(buf.feed(b), Ok(None));
        }
        assert_eq!(buf.feed(b'\n'), Ok(Some("get_clock")));
    }

    #[test]
    fn test_crlf_and_blank_lines() {
        let mut buf = LineBuffer::new();
        let got = feed_all(&mut buf, b"\r\n\nget_config\r\n\r\nget_clock\n");
        assert_eq!(got.as_slice(), &[Ok(10), Ok(9)]);
    }

    #[test]
    fn test_too_long_line_is_dropped_then_resyncs() {
        let mut buf = LineBuffer::new();
        for _ in 0..MAX_LINE_LEN + 10 {
            assert_eq!(buf.feed(b'x'), Ok(None));
        }
        assert_eq!(buf.feed(b'\n'), Err(LineError::TooLong));

        let got = feed_all(&mut buf, b"emergency_stop\n");
        assert_eq!(got.as_slice(), &[Ok(14)]);
    }

    #[test]
    fn test_invalid_byte_rejects_line() {
        let mut buf = LineBuffer::new();
        let got = feed_all(&mut buf, b"get_\x00clock\nget_clock\n");
        assert_eq!(got.as_slice(), &[Err(LineError::InvalidByte), Ok(9)]);
    }

    #[test]
    fn test_max_length_line_fits() {
        let mut buf = LineBuffer::new();
        for _ in 0..MAX_LINE_LEN {
            assert_eq!(buf.feed(b'a'), Ok(None));
        }
        assert_eq!(buf.feed(b'\n').map(|l| l.map(str::len)), Ok(Some(MAX_LINE_LEN)));
    }
}
