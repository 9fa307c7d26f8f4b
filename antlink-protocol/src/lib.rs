//! ANT Serial Message Protocol
//!
//! This crate defines the byte-level protocol spoken between a host MCU and
//! an ANT network processor over its asynchronous serial interface.
//!
//! # Frame Format
//!
//! ```text
//! ┌──────┬────────┬────────┬─────────────┬──────────┐
//! │ SYNC │ LENGTH │ MSG ID │ PAYLOAD     │ CHECKSUM │
//! │ 1B   │ 1B     │ 1B     │ 0–249B      │ 1B       │
//! └──────┴────────┴────────┴─────────────┴──────────┘
//! ```
//!
//! The checksum is the XOR of every byte before it, sync byte included.
//!
//! Nothing in here performs I/O; the link driver in `antlink-core` feeds
//! bytes into a [`FrameAssembler`] and writes encoded [`Frame`]s out.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod events;
pub mod frame;
pub mod messages;
pub mod rollover;

pub use events::{Broadcast, Capabilities, ChannelEvent, DataPage, DeviceMessage, ResponseCode};
pub use frame::{
    checksum, Frame, FrameAssembler, FrameError, FRAME_OVERHEAD, MAX_FRAME_SIZE,
    MAX_PAYLOAD_SIZE, SYNC_RX, SYNC_TX,
};
pub use messages::{message_name, ChannelType, ConfigMessage};
pub use rollover::RolloverCounter;
