//! RTS edge task
//!
//! The radio raises RTS while it is busy with a message from the host and
//! drops it when it can take the next one. Each completed pulse grants one
//! send.

use defmt::*;
use embassy_rp::gpio::Input;

use crate::channels::{READY, RTS_LEVEL};

#[embassy_executor::task]
pub async fn rts_task(mut rts: Input<'static>) {
    info!("RTS task started");

    RTS_LEVEL.set(rts.is_high());

    loop {
        rts.wait_for_rising_edge().await;
        RTS_LEVEL.set(true);
        trace!("RTS asserted");

        // The edge can arrive before the line settles; grant only at rest
        rts.wait_for_low().await;
        RTS_LEVEL.set(false);
        READY.on_ready_edge();
    }
}
