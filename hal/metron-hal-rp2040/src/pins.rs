//! Pins by number
//!
//! The host addresses pins by number, embassy by type. The bank holds every
//! GPIO the board hands to the host, type-erased, so config commands can
//! claim them at runtime.

use embassy_rp::gpio::AnyPin;
use embassy_rp::Peri;
use metron_hal::PinError;

/// GPIO count on the RP2040
pub const GPIO_COUNT: usize = 30;

/// Build a [`PinBank`] from named peripherals
///
/// ```ignore
/// let bank = pin_bank!(p; 2 => PIN_2, 3 => PIN_3, 25 => PIN_25);
/// ```
#[macro_export]
macro_rules! pin_bank {
    ($p:expr; $($num:literal => $field:ident),* $(,)?) => {{
        let mut bank = $crate::pins::PinBank::empty();
        $(
            bank.insert($num, embassy_rp::Peri::<embassy_rp::gpio::AnyPin>::from($p.$field));
        )*
        bank
    }};
}

/// Unclaimed GPIOs
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT],
}

impl PinBank {
    /// Bank with no pins
    pub fn empty() -> Self {
        Self {
            pins: core::array::from_fn(|_| None),
        }
    }

    /// Make `pin` available as number `num`
    ///
    /// Out-of-range numbers are ignored.
    pub fn insert(&mut self, num: u8, pin: Peri<'static, AnyPin>) {
        if let Some(slot) = self.pins.get_mut(num as usize) {
            *slot = Some(pin);
        }
    }

    /// Claim pin `num`
    pub fn take(&mut self, num: u32) -> Result<Peri<'static, AnyPin>, PinError> {
        self.pins
            .get_mut(num as usize)
            .ok_or(PinError::InvalidPin)?
            .take()
            .ok_or(PinError::AlreadyTaken)
    }
}
