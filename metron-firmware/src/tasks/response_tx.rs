//! Host UART transmit task

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use crate::channels::RESPONSES;

/// Response TX task - encodes queued responses as lines
#[embassy_executor::task]
pub async fn response_tx_task(mut tx: BufferedUartTx) {
    info!("Response TX task started");

    loop {
        let response = RESPONSES.receive().await;
        let line = match response.to_line() {
            Ok(line) => line,
            Err(_) => {
                warn!("Response does not fit a line: {:?}", response);
                continue;
            }
        };

        if let Err(e) = tx.write_all(line.as_bytes()).await {
            warn!("UART write error: {:?}", e);
        } else {
            trace!("TX: {=str}", line.as_str());
        }
    }
}
