//! Message identifiers and typed host-to-radio messages
//!
//! Message ids are divided into:
//! - Configuration and control messages sent by the host
//! - Responses, events and data sent by the radio

use crate::frame::{Frame, FrameError};

/// Message ids used on the serial interface
pub mod id {
    pub const INVALID: u8 = 0x00;
    pub const EVENT: u8 = 0x01;

    pub const VERSION: u8 = 0x3E;
    pub const RESPONSE_EVENT: u8 = 0x40;

    pub const UNASSIGN_CHANNEL: u8 = 0x41;
    pub const ASSIGN_CHANNEL: u8 = 0x42;
    pub const CHANNEL_MESG_PERIOD: u8 = 0x43;
    pub const CHANNEL_SEARCH_TIMEOUT: u8 = 0x44;
    pub const CHANNEL_RADIO_FREQ: u8 = 0x45;
    pub const NETWORK_KEY: u8 = 0x46;
    pub const RADIO_TX_POWER: u8 = 0x47;
    pub const SYSTEM_RESET: u8 = 0x4A;
    pub const OPEN_CHANNEL: u8 = 0x4B;
    pub const CLOSE_CHANNEL: u8 = 0x4C;
    pub const REQUEST: u8 = 0x4D;

    pub const BROADCAST_DATA: u8 = 0x4E;
    pub const ACKNOWLEDGED_DATA: u8 = 0x4F;
    pub const BURST_DATA: u8 = 0x50;

    pub const CHANNEL_ID: u8 = 0x51;
    pub const CHANNEL_STATUS: u8 = 0x52;
    pub const CAPABILITIES: u8 = 0x54;

    pub const OPEN_RX_SCAN: u8 = 0x5B;
    pub const EXT_BROADCAST_DATA: u8 = 0x5D;
    pub const EXT_ACKNOWLEDGED_DATA: u8 = 0x5E;
    pub const EXT_BURST_DATA: u8 = 0x5F;

    pub const CHANNEL_RADIO_TX_POWER: u8 = 0x60;
    pub const GET_SERIAL_NUM: u8 = 0x61;
    pub const SET_LP_SEARCH_TIMEOUT: u8 = 0x63;
    pub const RX_EXT_MESGS_ENABLE: u8 = 0x66;
    pub const ENABLE_LED_FLASH: u8 = 0x68;
    pub const STARTUP: u8 = 0x6F;

    pub const SERIAL_ERROR: u8 = 0xAE;
    pub const SLEEP: u8 = 0xC5;
}

/// Radio frequencies are expressed as an offset from this base
pub const RF_BASE_MHZ: u16 = 2400;

/// Human-readable name of a message id, for log output
pub fn message_name(msg_id: u8) -> &'static str {
    match msg_id {
        id::EVENT => "EVENT",
        id::VERSION => "VERSION",
        id::RESPONSE_EVENT => "RESPONSE_EVENT",
        id::UNASSIGN_CHANNEL => "UNASSIGN_CHANNEL",
        id::ASSIGN_CHANNEL => "ASSIGN_CHANNEL",
        id::CHANNEL_MESG_PERIOD => "CHANNEL_MESG_PERIOD",
        id::CHANNEL_SEARCH_TIMEOUT => "CHANNEL_SEARCH_TIMEOUT",
        id::CHANNEL_RADIO_FREQ => "CHANNEL_RADIO_FREQ",
        id::NETWORK_KEY => "NETWORK_KEY",
        id::SYSTEM_RESET => "SYSTEM_RESET",
        id::OPEN_CHANNEL => "OPEN_CHANNEL",
        id::CLOSE_CHANNEL => "CLOSE_CHANNEL",
        id::REQUEST => "REQUEST",
        id::BROADCAST_DATA => "BROADCAST_DATA",
        id::ACKNOWLEDGED_DATA => "ACKNOWLEDGED_DATA",
        id::CHANNEL_ID => "CHANNEL_ID",
        id::CHANNEL_STATUS => "CHANNEL_STATUS",
        id::CAPABILITIES => "CAPABILITIES",
        id::STARTUP => "START_UP",
        id::SERIAL_ERROR => "SERIAL_ERROR",
        _ => "...",
    }
}

/// Channel type carried by ASSIGN_CHANNEL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelType {
    /// Bidirectional receive (slave) channel
    #[default]
    Receive,
    /// Bidirectional transmit (master) channel
    Transmit,
    /// Shared bidirectional receive channel
    SharedReceive,
    /// Receive-only channel
    ReceiveOnly,
}

impl ChannelType {
    /// Wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            ChannelType::Receive => 0x00,
            ChannelType::Transmit => 0x10,
            ChannelType::SharedReceive => 0x20,
            ChannelType::ReceiveOnly => 0x40,
        }
    }
}

/// Configuration and control messages from the host to the radio
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigMessage {
    /// Ask the radio to send the message `requested` (e.g. CAPABILITIES)
    Request { channel: u8, requested: u8 },
    /// Assign a channel number to a network with a channel type
    AssignChannel {
        channel: u8,
        channel_type: ChannelType,
        network: u8,
    },
    /// Set the channel id; zeros act as wildcards on a receive channel
    SetChannelId {
        channel: u8,
        device_number: u16,
        device_type: u8,
        transmission_type: u8,
    },
    /// Load the 8-byte key of a network
    SetNetworkKey { network: u8, key: [u8; 8] },
    /// Search timeout in 2.5 s units
    SetSearchTimeout { channel: u8, timeout: u8 },
    /// RF frequency as an offset in MHz from [`RF_BASE_MHZ`]
    SetRadioFrequency { channel: u8, offset: u8 },
    /// Message period in 1/32768 s units
    SetMessagePeriod { channel: u8, period: u16 },
    OpenChannel { channel: u8 },
    CloseChannel { channel: u8 },
    UnassignChannel { channel: u8 },
    /// Software reset of the radio
    ResetSystem,
}

impl ConfigMessage {
    /// Message id of this message
    pub fn msg_id(&self) -> u8 {
        match self {
            ConfigMessage::Request { .. } => id::REQUEST,
            ConfigMessage::AssignChannel { .. } => id::ASSIGN_CHANNEL,
            ConfigMessage::SetChannelId { .. } => id::CHANNEL_ID,
            ConfigMessage::SetNetworkKey { .. } => id::NETWORK_KEY,
            ConfigMessage::SetSearchTimeout { .. } => id::CHANNEL_SEARCH_TIMEOUT,
            ConfigMessage::SetRadioFrequency { .. } => id::CHANNEL_RADIO_FREQ,
            ConfigMessage::SetMessagePeriod { .. } => id::CHANNEL_MESG_PERIOD,
            ConfigMessage::OpenChannel { .. } => id::OPEN_CHANNEL,
            ConfigMessage::CloseChannel { .. } => id::CLOSE_CHANNEL,
            ConfigMessage::UnassignChannel { .. } => id::UNASSIGN_CHANNEL,
            ConfigMessage::ResetSystem => id::SYSTEM_RESET,
        }
    }

    /// Message id the radio answers with
    ///
    /// A request is answered by the requested message itself, a reset by
    /// the start-up message, everything else by a channel response.
    pub fn expected_response(&self) -> Option<u8> {
        match self {
            ConfigMessage::Request { requested, .. } => Some(*requested),
            ConfigMessage::ResetSystem => Some(id::STARTUP),
            _ => Some(id::RESPONSE_EVENT),
        }
    }

    /// Encode this message into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            ConfigMessage::Request { channel, requested } => {
                Frame::new(id::REQUEST, &[*channel, *requested])
            }
            ConfigMessage::AssignChannel {
                channel,
                channel_type,
                network,
            } => Frame::new(
                id::ASSIGN_CHANNEL,
                &[*channel, channel_type.to_byte(), *network],
            ),
            ConfigMessage::SetChannelId {
                channel,
                device_number,
                device_type,
                transmission_type,
            } => {
                let [lsb, msb] = device_number.to_le_bytes();
                Frame::new(
                    id::CHANNEL_ID,
                    &[*channel, lsb, msb, *device_type, *transmission_type],
                )
            }
            ConfigMessage::SetNetworkKey { network, key } => {
                let mut payload = [0u8; 9];
                payload[0] = *network;
                payload[1..].copy_from_slice(key);
                Frame::new(id::NETWORK_KEY, &payload)
            }
            ConfigMessage::SetSearchTimeout { channel, timeout } => {
                Frame::new(id::CHANNEL_SEARCH_TIMEOUT, &[*channel, *timeout])
            }
            ConfigMessage::SetRadioFrequency { channel, offset } => {
                Frame::new(id::CHANNEL_RADIO_FREQ, &[*channel, *offset])
            }
            ConfigMessage::SetMessagePeriod { channel, period } => {
                let [lsb, msb] = period.to_le_bytes();
                Frame::new(id::CHANNEL_MESG_PERIOD, &[*channel, lsb, msb])
            }
            ConfigMessage::OpenChannel { channel } => Frame::new(id::OPEN_CHANNEL, &[*channel]),
            ConfigMessage::CloseChannel { channel } => Frame::new(id::CLOSE_CHANNEL, &[*channel]),
            ConfigMessage::UnassignChannel { channel } => {
                Frame::new(id::UNASSIGN_CHANNEL, &[*channel])
            }
            // Payload is a single filler byte
            ConfigMessage::ResetSystem => Frame::new(id::SYSTEM_RESET, &[0]),
        }
    }
}
