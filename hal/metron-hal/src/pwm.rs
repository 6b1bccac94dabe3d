//! Hardware PWM abstraction

/// Hardware PWM output
///
/// Duty is expressed on the host scale of 0-255. The cycle length is fixed
/// when the pin is set up through [`crate::Board::setup_pwm`].
pub trait PwmPin {
    /// Apply a new duty value
    fn write_duty(&mut self, duty: u8);

    /// Duty value last written
    fn duty(&self) -> u8;
}
