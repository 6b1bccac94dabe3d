//! GPIO pin abstractions
//!
//! Provides the digital output trait used by the digital-out and soft-PWM
//! controllers.

/// Digital output pin
///
/// A handle returned by [`crate::Board::setup_digital`]. Implementations
/// should do nothing more than the register write; they are called from
/// timer context.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Toggle the pin state
    fn toggle(&mut self);

    /// Set the pin to a specific state
    fn write(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct LatchPin {
        high: bool,
        writes: u8,
    }

    impl OutputPin for LatchPin {
        fn set_high(&mut self) {
            self.high = true;
            self.writes += 1;
        }

        fn set_low(&mut self) {
            self.high = false;
            self.writes += 1;
        }

        fn toggle(&mut self) {
            self.high = !self.high;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    #[test]
    fn test_write_dispatches_to_level_setters() {
        let mut pin = LatchPin {
            high: false,
            writes: 0,
        };

        pin.write(true);
        assert!(pin.is_set_high());
        pin.write(false);
        assert!(!pin.is_set_high());
        assert_eq!(pin.writes, 2);
    }
}
