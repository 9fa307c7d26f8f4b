//! Radio task
//!
//! Resets the radio, brings up the receive channel, then reads broadcasts
//! until the radio reports the channel closed, at which point the channel
//! is brought up again.

use defmt::*;
use embassy_time::{Delay, Timer};

use antlink_core::{AntDriver, ChannelConfig, ChannelSetup, EstablishStatus, LinkError, PinControl};
use antlink_hal_rp2040::{EmbassyClock, MirroredLevel, RpOutput, RpSerial};
use antlink_protocol::{DeviceMessage, Frame, ResponseCode, RolloverCounter};

/// Control lines wired to the radio module
pub type RadioControlPins = PinControl<
    RpOutput<'static>,
    RpOutput<'static>,
    RpOutput<'static>,
    &'static MirroredLevel,
    Delay,
>;

/// The link driver as wired on this board
pub type RadioDriver = AntDriver<'static, RpSerial, EmbassyClock, RadioControlPins>;

/// What a received frame means for the task
enum Next {
    Continue,
    Reopen,
}

#[embassy_executor::task]
pub async fn radio_task(mut driver: RadioDriver, channel: ChannelConfig) {
    info!("Radio task started");

    driver.hardware_reset();

    loop {
        establish(&mut driver, channel).await;
        info!(
            "Channel {} open at {} MHz, device type {}",
            channel.channel_number,
            channel.frequency_mhz(),
            channel.device_type
        );
        receive(&mut driver).await;
        warn!("Channel closed, reopening");
    }
}

/// Run establishment to completion, reading responses between steps
async fn establish(driver: &mut RadioDriver, channel: ChannelConfig) {
    let mut setup = ChannelSetup::new(channel);

    loop {
        match driver.progress_channel_establishment(&mut setup) {
            Ok(EstablishStatus::Complete) => return,
            Ok(EstablishStatus::Progressing) => {}
            Err(LinkError::LinkStall) => {
                warn!("Link stalled, radio reset (#{})", driver.hard_reset_count());
            }
            Err(e) if e.is_recoverable() => warn!("Channel setup error: {}", e),
            Err(e) => {
                error!("Link failed during setup: {}", e);
                driver.hardware_reset();
                setup.restart();
            }
        }

        if let Some(expected) = driver.awaiting_response() {
            trace!("Waiting for {}", antlink_protocol::message_name(expected));
        }

        match driver.poll_packet() {
            Ok(Some(received)) => match DeviceMessage::from_frame(received.frame()) {
                Ok(DeviceMessage::ChannelEvent(event)) if event.code.is_error() => {
                    warn!(
                        "{} rejected: {}",
                        antlink_protocol::message_name(event.msg_id),
                        event.code
                    );
                }
                // A START_UP nobody asked for means the radio rebooted
                Ok(DeviceMessage::Startup { reason }) if !received.is_expected() => {
                    warn!("Radio restarted during setup (reason {=u8:#x})", reason);
                    setup.restart();
                }
                _ => {}
            },
            Ok(None) => {}
            Err(e) => debug!("RX error during setup: {}", e),
        }

        Timer::after_millis(1).await;
    }
}

/// Read broadcasts until the channel closes
async fn receive(driver: &mut RadioDriver) {
    let mut beats = RolloverCounter::new();

    loop {
        match driver.poll_packet() {
            Ok(Some(received)) => {
                if let Next::Reopen = handle(received.frame(), &mut beats) {
                    return;
                }
            }
            Ok(None) => {}
            Err(e) => debug!("RX error: {}", e),
        }

        Timer::after_millis(1).await;
    }
}

fn handle(frame: &Frame, beats: &mut RolloverCounter) -> Next {
    let message = match DeviceMessage::from_frame(frame) {
        Ok(message) => message,
        Err(_) => {
            trace!("Ignoring {}", antlink_protocol::message_name(frame.msg_id));
            return Next::Continue;
        }
    };

    match message {
        DeviceMessage::Broadcast(broadcast) => {
            let page = broadcast.data_page();
            // Heart-rate pages carry the beat event count in byte 6
            let delta = beats.update(broadcast.data[6]);
            info!(
                "ch{} page {} beats +{} (total {})",
                broadcast.channel,
                page.page_number & 0x7F,
                delta,
                beats.total()
            );
            Next::Continue
        }
        DeviceMessage::ChannelEvent(event) if event.is_event() => match event.code {
            ResponseCode::ChannelClosed => Next::Reopen,
            ResponseCode::RxSearchTimeout => {
                info!("ch{} search timed out", event.channel);
                Next::Continue
            }
            ResponseCode::RxFail => {
                debug!("ch{} missed a message", event.channel);
                Next::Continue
            }
            code => {
                debug!("ch{} event {}", event.channel, code);
                Next::Continue
            }
        },
        DeviceMessage::ChannelEvent(event) => {
            debug!("{} response: {}", antlink_protocol::message_name(event.msg_id), event.code);
            Next::Continue
        }
        DeviceMessage::Startup { reason } => {
            warn!("Radio restarted unexpectedly (reason {=u8:#x})", reason);
            Next::Reopen
        }
        DeviceMessage::Capabilities(caps) => {
            debug!("{} channels, {} networks", caps.max_channels, caps.max_networks);
            Next::Continue
        }
    }
}
