//! Fatal conditions
//!
//! Every error in the core is fatal: it is returned up to [`crate::Mcu`],
//! which halts, runs the shutdown sweep and refuses further commands.

use metron_hal::PinError;

/// Why the MCU halted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShutdownReason {
    /// A digital/PWM deadline guard fired before the host followed up
    MissedPinEvent,
    /// A soft-PWM load fired with no pending program
    MissedPwmEvent,
    /// A soft-PWM schedule starts before the current end time
    SoftPwmOverlap,
    /// Oid out of range or already configured
    OidUnavailable,
    /// Oid not configured, or configured as another kind
    InvalidOidType,
    /// Pin out of range or reserved
    InvalidPin,
    /// Pin already owned by another output
    PinInUse,
    /// Pin has no hardware PWM channel
    NotPwmPin,
    /// Timer dispatch kept finding due timers
    TimerTooClose,
    /// Host asked for a halt
    CommandRequest,
}

impl ShutdownReason {
    /// Message reported to the host
    pub fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::MissedPinEvent => "Missed scheduling of next pin event",
            ShutdownReason::MissedPwmEvent => "Missed scheduling of next pwm event",
            ShutdownReason::SoftPwmOverlap => "next soft pwm extends existing pwm",
            ShutdownReason::OidUnavailable => "Can't assign oid",
            ShutdownReason::InvalidOidType => "Invalid oid type",
            ShutdownReason::InvalidPin => "Invalid pin",
            ShutdownReason::PinInUse => "Pin already in use",
            ShutdownReason::NotPwmPin => "Not a valid PWM pin",
            ShutdownReason::TimerTooClose => "Rescheduled timer in the past",
            ShutdownReason::CommandRequest => "Command request",
        }
    }
}

impl From<PinError> for ShutdownReason {
    fn from(err: PinError) -> Self {
        match err {
            PinError::InvalidPin => ShutdownReason::InvalidPin,
            PinError::AlreadyTaken => ShutdownReason::PinInUse,
            PinError::NotPwmCapable => ShutdownReason::NotPwmPin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_errors_map_to_reasons() {
        assert_eq!(
            ShutdownReason::from(PinError::NotPwmCapable),
            ShutdownReason::NotPwmPin
        );
        assert_eq!(
            ShutdownReason::from(PinError::InvalidPin).as_str(),
            "Invalid pin"
        );
    }
}
