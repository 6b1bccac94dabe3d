//! Metron - Scheduled-Output Firmware
//!
//! Main firmware binary for RP2040 boards. The host schedules pin changes
//! at absolute clock ticks; this firmware performs them on time and halts
//! everything to safe defaults when a deadline is missed.
//!
//! Named after the metronome: every output moves on the beat it was given.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::AnyPin;
use embassy_rp::peripherals::UART0;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_rp::Peri;
use heapless::Vec;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use metron_core::{BoardConfig, Mcu, SharedMcu};
use metron_hal_rp2040::{pin_bank, HwPwm, PwmChannel, Rp2040Board, MAX_PWM_PINS};

mod channels;
mod tasks;

/// Board constants generated from board.toml
mod board {
    include!(concat!(env!("OUT_DIR"), "/board_config.rs"));
}

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// The MCU, shared by the command and timer tasks
pub static MCU: SharedMcu<Rp2040Board> = SharedMcu::new();

/// Bind a slice to its channel A pin if board.toml lists it as PWM,
/// otherwise hand the pin to the bank as a plain GPIO
macro_rules! wire_pwm {
    ($pwms:ident, $bank:ident, $slice:expr, $pin:expr, $num:literal) => {
        if board::PWM_PINS.contains(&$num) {
            let pwm = Pwm::new_output_a($slice, $pin, PwmConfig::default());
            if $pwms.push(HwPwm::new($num, pwm, PwmChannel::A)).is_err() {
                warn!("No room for PWM pin {}", $num);
            }
        } else {
            $bank.insert($num, Peri::<AnyPin>::from($pin));
        }
    };
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Metron firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Setup UART for the host link
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = board::UART_BAUD;

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    info!("UART initialized at {} baud", board::UART_BAUD);

    // GPIOs the host may claim by number. UART0 and the Pico's power
    // management pins (23, 24, 29) stay out of the bank.
    let mut bank = pin_bank!(p;
        2 => PIN_2, 3 => PIN_3, 4 => PIN_4, 5 => PIN_5, 6 => PIN_6, 7 => PIN_7,
        8 => PIN_8, 9 => PIN_9, 10 => PIN_10, 11 => PIN_11, 12 => PIN_12,
        13 => PIN_13, 14 => PIN_14, 15 => PIN_15, 17 => PIN_17, 19 => PIN_19,
        21 => PIN_21, 25 => PIN_25, 26 => PIN_26, 27 => PIN_27, 28 => PIN_28,
    );

    let mut pwms: Vec<HwPwm, MAX_PWM_PINS> = Vec::new();
    wire_pwm!(pwms, bank, p.PWM_SLICE0, p.PIN_16, 16);
    wire_pwm!(pwms, bank, p.PWM_SLICE1, p.PIN_18, 18);
    wire_pwm!(pwms, bank, p.PWM_SLICE2, p.PIN_20, 20);
    wire_pwm!(pwms, bank, p.PWM_SLICE3, p.PIN_22, 22);

    let mut rp_board = Rp2040Board::new(bank);
    for pwm in pwms {
        let num = pwm.num();
        if rp_board.add_pwm(pwm).is_err() {
            warn!("PWM pin {} not registered", num);
        }
    }
    info!("Pins initialized, {} PWM channels", board::PWM_PINS.len());

    let config = BoardConfig::with_reserved(
        embassy_time::TICK_HZ as u32,
        board::PIN_COUNT,
        board::RESERVED_PINS,
    )
    .unwrap();
    info!("Clock: {} ticks/s", config.clock_freq);

    MCU.init(Mcu::new(rp_board, config));

    // Spawn tasks
    spawner.spawn(tasks::timer_task()).unwrap();
    spawner.spawn(tasks::command_rx_task(rx)).unwrap();
    spawner.spawn(tasks::response_tx_task(tx)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
