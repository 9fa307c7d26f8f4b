//! Link and channel configuration
//!
//! [`LinkConfig`] tunes the driver itself; [`ChannelConfig`] describes one
//! logical radio channel to bring up. Both are plain data supplied by the
//! application (the firmware builds them from `radio.toml`).

use antlink_protocol::messages::RF_BASE_MHZ;
use antlink_protocol::SYNC_TX;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Time to wait for the first byte of a frame
pub const DEFAULT_READ_TIMEOUT_MS: u32 = 100;

/// Time to wait for each further byte once a frame has started
pub const DEFAULT_INTER_BYTE_TIMEOUT_MS: u32 = 10;

/// Largest frame accepted by default, checksum included
pub const DEFAULT_MAX_FRAME_LEN: usize = 80;

/// Failed sends with RTS at rest before the link is declared stalled
pub const DEFAULT_STALL_THRESHOLD: u16 = 50;

/// Width of the RESET pulse
pub const DEFAULT_RESET_PULSE_MS: u32 = 10;

/// Driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkConfig {
    /// Sync byte expected at the start of received frames
    pub sync: u8,
    /// Default first-byte timeout for reads (ms)
    pub read_timeout_ms: u32,
    /// Deadline extension per received byte (ms)
    pub inter_byte_timeout_ms: u32,
    /// Largest accepted frame, checksum included
    pub max_frame_len: usize,
    /// Consecutive stall strikes before a hardware reset
    pub stall_threshold: u16,
    /// RESET pulse width (ms)
    pub reset_pulse_ms: u32,
    /// Hold sends after a reset until the radio's START_UP message arrives
    pub await_startup_after_reset: bool,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            sync: SYNC_TX,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            inter_byte_timeout_ms: DEFAULT_INTER_BYTE_TIMEOUT_MS,
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
            stall_threshold: DEFAULT_STALL_THRESHOLD,
            reset_pulse_ms: DEFAULT_RESET_PULSE_MS,
            await_startup_after_reset: true,
        }
    }
}

/// One logical receive channel
///
/// Immutable for the duration of an establishment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChannelConfig {
    /// Channel number on the radio
    pub channel_number: u8,
    /// Network number the channel is assigned to
    pub network_number: u8,
    /// Search timeout in 2.5 s units
    pub search_timeout: u8,
    /// Device type to pair with (bit 7 requests pairing)
    pub device_type: u8,
    /// RF frequency offset in MHz from 2400 MHz
    pub frequency_offset: u8,
    /// Channel message period in 1/32768 s units
    pub message_period: u16,
    /// Network key
    pub network_key: [u8; 8],
}

impl ChannelConfig {
    /// Heart-rate monitor receive channel on channel 0, network 0
    ///
    /// The network key is issued by the network owner and must be
    /// supplied by the application.
    pub fn heart_rate(network_key: [u8; 8]) -> Self {
        Self {
            channel_number: 0,
            network_number: 0,
            search_timeout: 12,
            device_type: 120,
            frequency_offset: 57,
            message_period: 8070,
            network_key,
        }
    }

    /// Absolute channel frequency in MHz
    pub fn frequency_mhz(&self) -> u16 {
        RF_BASE_MHZ + self.frequency_offset as u16
    }
}
