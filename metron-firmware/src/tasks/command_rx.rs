//! Host UART receive task
//!
//! Splits the byte stream into lines, decodes them and hands each command
//! to the MCU.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use metron_protocol::{Command, LineBuffer, Response};

use crate::channels::{RESPONSES, TIMER_WAKE};
use crate::MCU;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Command RX task - decodes host lines and dispatches them
#[embassy_executor::task]
pub async fn command_rx_task(mut rx: BufferedUartRx) {
    info!("Command RX task started");

    let mut line = LineBuffer::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) => {
                for &byte in &buf[..n] {
                    match line.feed(byte) {
                        Ok(Some(text)) => dispatch(text).await,
                        Ok(None) => {}
                        Err(e) => warn!("Dropped line: {:?}", e),
                    }
                }
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

/// Decode one line and run it
async fn dispatch(text: &str) {
    let cmd = match Command::parse(text) {
        Ok(cmd) => cmd,
        Err(e) => {
            warn!("Bad command {=str}: {:?}", text, e);
            return;
        }
    };
    debug!("Command: {=str}", cmd.name());

    let response = MCU.handle(&cmd);
    TIMER_WAKE.signal(());

    if let Some(response) = response {
        if let Response::Shutdown { reason, .. } = response {
            error!("Shutdown: {=str}", reason);
        }
        RESPONSES.send(response).await;
    }
}
