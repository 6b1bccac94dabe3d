//! Oid registry
//!
//! Fixed arena of output records indexed by oid. A slot is filled once by a
//! config command and lives until reset; the shutdown sweep walks every
//! filled slot.

use metron_hal::Board;

use crate::error::ShutdownReason;
use crate::output::{DigitalOut, Output, OutputKind, PwmOut, SoftPwm};
use crate::sched::TimerAction;

/// Output records by oid
pub struct Oids<B: Board, const N: usize> {
    slots: [Option<Output<B>>; N],
}

impl<B: Board, const N: usize> Default for Oids<B, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Board, const N: usize> Oids<B, N> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| None),
        }
    }

    /// Check `oid` can take a new record
    pub fn check_vacant(&self, oid: u8) -> Result<(), ShutdownReason> {
        match self.slots.get(oid as usize) {
            Some(None) => Ok(()),
            _ => Err(ShutdownReason::OidUnavailable),
        }
    }

    /// Store a new record under `oid`
    pub fn insert(&mut self, oid: u8, output: Output<B>) -> Result<(), ShutdownReason> {
        match self.slots.get_mut(oid as usize) {
            Some(slot @ None) => {
                *slot = Some(output);
                Ok(())
            }
            _ => Err(ShutdownReason::OidUnavailable),
        }
    }

    /// Record under `oid`
    pub fn get(&self, oid: u8) -> Option<&Output<B>> {
        self.slots.get(oid as usize)?.as_ref()
    }

    /// Mutable record under `oid`
    pub fn get_mut(&mut self, oid: u8) -> Option<&mut Output<B>> {
        self.slots.get_mut(oid as usize)?.as_mut()
    }

    /// Kind of the record under `oid`
    pub fn kind(&self, oid: u8) -> Option<OutputKind> {
        self.get(oid).map(Output::kind)
    }

    /// Digital output under `oid`
    pub fn digital_out(&mut self, oid: u8) -> Result<&mut DigitalOut<B::Digital>, ShutdownReason> {
        match self.get_mut(oid) {
            Some(Output::Digital(out)) => Ok(out),
            _ => Err(ShutdownReason::InvalidOidType),
        }
    }

    /// Hardware PWM output under `oid`
    pub fn pwm_out(&mut self, oid: u8) -> Result<&mut PwmOut<B::Pwm>, ShutdownReason> {
        match self.get_mut(oid) {
            Some(Output::Pwm(out)) => Ok(out),
            _ => Err(ShutdownReason::InvalidOidType),
        }
    }

    /// Soft-PWM output under `oid`
    pub fn soft_pwm(&mut self, oid: u8) -> Result<&mut SoftPwm<B::Digital>, ShutdownReason> {
        match self.get_mut(oid) {
            Some(Output::SoftPwm(out)) => Ok(out),
            _ => Err(ShutdownReason::InvalidOidType),
        }
    }

    /// Run the timer callback of the record under `oid`
    pub fn on_timer(&mut self, oid: u8) -> Result<TimerAction, ShutdownReason> {
        self.get_mut(oid)
            .ok_or(ShutdownReason::InvalidOidType)?
            .on_timer()
    }

    /// Force every configured output back to its default
    pub fn shutdown_all(&mut self) {
        for output in self.slots.iter_mut().flatten() {
            output.shutdown();
        }
    }

    /// Configured records with their oids
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Output<B>)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(oid, slot)| slot.as_ref().map(|out| (oid as u8, out)))
    }

    /// Number of configured records
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metron_hal::mock::MockBoard;
    use metron_hal::OutputPin;

    fn digital(board: &mut MockBoard, pin: u32) -> Output<MockBoard> {
        let handle = board.setup_digital(pin, false).unwrap();
        Output::Digital(DigitalOut::digital(handle, 0, 0))
    }

    #[test]
    fn test_insert_once() {
        let mut board = MockBoard::new();
        let mut oids: Oids<MockBoard, 4> = Oids::new();

        assert_eq!(oids.check_vacant(1), Ok(()));
        oids.insert(1, digital(&mut board, 5)).unwrap();
        assert_eq!(oids.check_vacant(1), Err(ShutdownReason::OidUnavailable));
        assert_eq!(
            oids.insert(1, digital(&mut board, 6)).err(),
            Some(ShutdownReason::OidUnavailable)
        );
        assert_eq!(oids.check_vacant(4), Err(ShutdownReason::OidUnavailable));
        assert_eq!(oids.len(), 1);
    }

    #[test]
    fn test_lookup_checks_kind() {
        let mut board = MockBoard::new();
        let mut oids: Oids<MockBoard, 4> = Oids::new();
        oids.insert(0, digital(&mut board, 5)).unwrap();

        assert!(oids.digital_out(0).is_ok());
        assert_eq!(oids.kind(0), Some(OutputKind::Digital));
        assert_eq!(oids.pwm_out(0).err(), Some(ShutdownReason::InvalidOidType));
        assert_eq!(oids.soft_pwm(2).err(), Some(ShutdownReason::InvalidOidType));
        assert_eq!(oids.on_timer(3), Err(ShutdownReason::InvalidOidType));
    }

    #[test]
    fn test_shutdown_all_visits_every_kind() {
        let mut board = MockBoard::new();
        let mut oids: Oids<MockBoard, 4> = Oids::new();

        oids.insert(0, digital(&mut board, 1)).unwrap();
        let pwm = board.setup_pwm(2, 1000, 0).unwrap();
        oids.insert(1, Output::Pwm(PwmOut::pwm(pwm, 0, 0))).unwrap();
        let soft = board.setup_digital(3, false).unwrap();
        oids.insert(3, Output::SoftPwm(SoftPwm::new(soft, 1000, 0, 0)))
            .unwrap();

        oids.digital_out(0).unwrap().schedule(0, 1);
        oids.on_timer(0).unwrap();
        oids.pwm_out(1).unwrap().schedule(0, 77);
        oids.on_timer(1).unwrap();
        oids.soft_pwm(3).unwrap().schedule(0, 255).unwrap();
        oids.on_timer(3).unwrap();

        oids.shutdown_all();

        assert!(!oids.digital_out(0).unwrap().pin().is_set_high());
        assert_eq!(oids.pwm_out(1).unwrap().value(), 0);
        assert!(!oids.soft_pwm(3).unwrap().pin().is_set_high());
        let configured: heapless::Vec<u8, 4> = oids.iter().map(|(oid, _)| oid).collect();
        assert_eq!(&configured[..], &[0, 1, 3]);
    }
}
