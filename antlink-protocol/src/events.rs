//! Messages originated by the radio

use crate::frame::{Frame, FrameError};
use crate::messages::id;

/// Result code carried by a channel response or event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResponseCode {
    /// Command accepted
    NoError,
    /// Receive search timed out
    RxSearchTimeout,
    /// Expected message was not received in its slot
    RxFail,
    /// Broadcast transmitted
    Tx,
    /// Channel was closed
    ChannelClosed,
    /// Too many missed messages; channel went back to search
    RxFailGoToSearch,
    /// Two channels collided on the same timeslot
    ChannelCollision,
    /// Command not valid in the channel's current state
    ChannelInWrongState,
    /// Channel is not open
    ChannelNotOpened,
    /// Channel id has not been set
    ChannelIdNotSet,
    /// Message was malformed or not supported
    InvalidMessage,
    /// Network number out of range
    InvalidNetworkNumber,
    /// Any code not listed above
    Other(u8),
}

// Wire format values
const RESPONSE_NO_ERROR: u8 = 0x00;
const EVENT_RX_SEARCH_TIMEOUT: u8 = 0x01;
const EVENT_RX_FAIL: u8 = 0x02;
const EVENT_TX: u8 = 0x03;
const EVENT_CHANNEL_CLOSED: u8 = 0x07;
const EVENT_RX_FAIL_GO_TO_SEARCH: u8 = 0x08;
const EVENT_CHANNEL_COLLISION: u8 = 0x09;
const CHANNEL_IN_WRONG_STATE: u8 = 0x15;
const CHANNEL_NOT_OPENED: u8 = 0x16;
const CHANNEL_ID_NOT_SET: u8 = 0x18;
const INVALID_MESSAGE: u8 = 0x28;
const INVALID_NETWORK_NUMBER: u8 = 0x29;

impl ResponseCode {
    /// Parse a code from its wire format byte
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            RESPONSE_NO_ERROR => ResponseCode::NoError,
            EVENT_RX_SEARCH_TIMEOUT => ResponseCode::RxSearchTimeout,
            EVENT_RX_FAIL => ResponseCode::RxFail,
            EVENT_TX => ResponseCode::Tx,
            EVENT_CHANNEL_CLOSED => ResponseCode::ChannelClosed,
            EVENT_RX_FAIL_GO_TO_SEARCH => ResponseCode::RxFailGoToSearch,
            EVENT_CHANNEL_COLLISION => ResponseCode::ChannelCollision,
            CHANNEL_IN_WRONG_STATE => ResponseCode::ChannelInWrongState,
            CHANNEL_NOT_OPENED => ResponseCode::ChannelNotOpened,
            CHANNEL_ID_NOT_SET => ResponseCode::ChannelIdNotSet,
            INVALID_MESSAGE => ResponseCode::InvalidMessage,
            INVALID_NETWORK_NUMBER => ResponseCode::InvalidNetworkNumber,
            other => ResponseCode::Other(other),
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            ResponseCode::NoError => RESPONSE_NO_ERROR,
            ResponseCode::RxSearchTimeout => EVENT_RX_SEARCH_TIMEOUT,
            ResponseCode::RxFail => EVENT_RX_FAIL,
            ResponseCode::Tx => EVENT_TX,
            ResponseCode::ChannelClosed => EVENT_CHANNEL_CLOSED,
            ResponseCode::RxFailGoToSearch => EVENT_RX_FAIL_GO_TO_SEARCH,
            ResponseCode::ChannelCollision => EVENT_CHANNEL_COLLISION,
            ResponseCode::ChannelInWrongState => CHANNEL_IN_WRONG_STATE,
            ResponseCode::ChannelNotOpened => CHANNEL_NOT_OPENED,
            ResponseCode::ChannelIdNotSet => CHANNEL_ID_NOT_SET,
            ResponseCode::InvalidMessage => INVALID_MESSAGE,
            ResponseCode::InvalidNetworkNumber => INVALID_NETWORK_NUMBER,
            ResponseCode::Other(code) => code,
        }
    }

    /// Returns true if this code reports a rejected command
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            ResponseCode::ChannelInWrongState
                | ResponseCode::ChannelNotOpened
                | ResponseCode::ChannelIdNotSet
                | ResponseCode::InvalidMessage
                | ResponseCode::InvalidNetworkNumber
        )
    }
}

/// Channel response or event
///
/// Payload: `[channel][msg id being responded to][code]`. Radio-initiated
/// events carry [`id::EVENT`] in the middle byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelEvent {
    pub channel: u8,
    pub msg_id: u8,
    pub code: ResponseCode,
}

impl ChannelEvent {
    /// Returns true for a radio-initiated event rather than a command response
    pub fn is_event(&self) -> bool {
        self.msg_id == id::EVENT
    }
}

/// Broadcast data received on a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Broadcast {
    pub channel: u8,
    pub data: [u8; 8],
}

impl Broadcast {
    /// Split the 8 data bytes into a device profile data page
    pub fn data_page(&self) -> DataPage {
        let mut sensor_specific = [0u8; 7];
        sensor_specific.copy_from_slice(&self.data[1..]);
        DataPage {
            page_number: self.data[0],
            sensor_specific,
        }
    }
}

/// Device profile data page carried in a broadcast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DataPage {
    pub page_number: u8,
    pub sensor_specific: [u8; 7],
}

/// Capabilities report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Capabilities {
    pub max_channels: u8,
    pub max_networks: u8,
    pub standard_options: u8,
    pub advanced_options: u8,
}

/// Messages parsed from radio-originated frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceMessage {
    /// Response to a command, or a channel event
    ChannelEvent(ChannelEvent),
    /// Broadcast data
    Broadcast(Broadcast),
    /// Answer to a capabilities request
    Capabilities(Capabilities),
    /// Radio finished booting; the byte holds the reset reason bits
    Startup { reason: u8 },
}

impl DeviceMessage {
    /// Parse a message from a frame
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        let payload = &frame.payload[..];
        match frame.msg_id {
            id::RESPONSE_EVENT => match payload {
                [channel, msg_id, code, ..] => Ok(DeviceMessage::ChannelEvent(ChannelEvent {
                    channel: *channel,
                    msg_id: *msg_id,
                    code: ResponseCode::from_byte(*code),
                })),
                _ => Err(FrameError::InvalidFrame),
            },
            id::BROADCAST_DATA => {
                if payload.len() < 9 {
                    return Err(FrameError::InvalidFrame);
                }
                let mut data = [0u8; 8];
                data.copy_from_slice(&payload[1..9]);
                Ok(DeviceMessage::Broadcast(Broadcast {
                    channel: payload[0],
                    data,
                }))
            }
            id::CAPABILITIES => match payload {
                [max_channels, max_networks, standard_options, advanced_options, ..] => {
                    Ok(DeviceMessage::Capabilities(Capabilities {
                        max_channels: *max_channels,
                        max_networks: *max_networks,
                        standard_options: *standard_options,
                        advanced_options: *advanced_options,
                    }))
                }
                _ => Err(FrameError::InvalidFrame),
            },
            id::STARTUP => Ok(DeviceMessage::Startup {
                reason: payload.first().copied().unwrap_or(0),
            }),
            _ => Err(FrameError::InvalidFrame),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_code_roundtrip() {
        for byte in [0x00, 0x01, 0x02, 0x03, 0x07, 0x08, 0x09, 0x15, 0x16, 0x18, 0x28, 0x29, 0x77] {
            assert_eq!(ResponseCode::from_byte(byte).to_byte(), byte);
        }
        assert_eq!(ResponseCode::from_byte(0x77), ResponseCode::Other(0x77));
    }

    #[test]
    fn test_response_code_errors() {
        assert!(!ResponseCode::NoError.is_error());
        assert!(!ResponseCode::RxFail.is_error());
        assert!(ResponseCode::ChannelInWrongState.is_error());
        assert!(ResponseCode::InvalidMessage.is_error());
    }

    #[test]
    fn test_channel_response() {
        let frame = Frame::new(id::RESPONSE_EVENT, &[0, id::OPEN_CHANNEL, 0]).unwrap();
        let msg = DeviceMessage::from_frame(&frame).unwrap();
        assert_eq!(
            msg,
            DeviceMessage::ChannelEvent(ChannelEvent {
                channel: 0,
                msg_id: id::OPEN_CHANNEL,
                code: ResponseCode::NoError,
            })
        );
    }

    #[test]
    fn test_channel_event() {
        let frame = Frame::new(id::RESPONSE_EVENT, &[0, id::EVENT, 0x01]).unwrap();
        let DeviceMessage::ChannelEvent(event) = DeviceMessage::from_frame(&frame).unwrap() else {
            panic!("expected channel event");
        };
        assert!(event.is_event());
        assert_eq!(event.code, ResponseCode::RxSearchTimeout);
    }

    #[test]
    fn test_broadcast_and_data_page() {
        let frame = Frame::new(id::BROADCAST_DATA, &[0, 0x84, 1, 2, 3, 4, 5, 0x2A, 72]).unwrap();
        let DeviceMessage::Broadcast(broadcast) = DeviceMessage::from_frame(&frame).unwrap()
        else {
            panic!("expected broadcast");
        };
        assert_eq!(broadcast.channel, 0);

        let page = broadcast.data_page();
        assert_eq!(page.page_number, 0x84);
        assert_eq!(page.sensor_specific, [1, 2, 3, 4, 5, 0x2A, 72]);
    }

    #[test]
    fn test_capabilities() {
        let frame = Frame::new(id::CAPABILITIES, &[8, 3, 0, 0xBA, 0x36, 0]).unwrap();
        let msg = DeviceMessage::from_frame(&frame).unwrap();
        assert_eq!(
            msg,
            DeviceMessage::Capabilities(Capabilities {
                max_channels: 8,
                max_networks: 3,
                standard_options: 0,
                advanced_options: 0xBA,
            })
        );
    }

    #[test]
    fn test_short_payloads_rejected() {
        let short = [
            Frame::new(id::RESPONSE_EVENT, &[0, 1]).unwrap(),
            Frame::new(id::BROADCAST_DATA, &[0; 8]).unwrap(),
            Frame::new(id::CAPABILITIES, &[8]).unwrap(),
        ];
        for frame in &short {
            assert_eq!(
                DeviceMessage::from_frame(frame),
                Err(FrameError::InvalidFrame)
            );
        }
    }

    #[test]
    fn test_startup_and_unknown() {
        let frame = Frame::new(id::STARTUP, &[0x20]).unwrap();
        assert_eq!(
            DeviceMessage::from_frame(&frame),
            Ok(DeviceMessage::Startup { reason: 0x20 })
        );

        let unknown = Frame::empty(0xF0);
        assert_eq!(
            DeviceMessage::from_frame(&unknown),
            Err(FrameError::InvalidFrame)
        );
    }
}
