//! Timer dispatch task
//!
//! Sleeps until the earliest armed wake time, then runs every due timer.
//! A command signals [`TIMER_WAKE`] so a newly armed earlier timer is not
//! missed while sleeping.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Instant, Timer};

use crate::channels::{RESPONSES, TIMER_WAKE};
use crate::MCU;

/// Timer task - drives every scheduled output
#[embassy_executor::task]
pub async fn timer_task() {
    info!("Timer task started");

    loop {
        let Some((waketime, now)) = MCU.next_waketime() else {
            TIMER_WAKE.wait().await;
            continue;
        };

        let delay = waketime.wrapping_sub(now) as i32;
        if delay > 0 {
            let deadline = Instant::now() + Duration::from_ticks(delay as u64);
            if let Either::Second(()) = select(Timer::at(deadline), TIMER_WAKE.wait()).await {
                continue;
            }
        }

        trace!("Timers due at {}", waketime);
        if let Some(response) = MCU.run_timers() {
            error!("Shutdown: {:?}", response);
            if RESPONSES.try_send(response).is_err() {
                warn!("Response queue full, shutdown notice dropped");
            }
        }
    }
}
