//! Board-agnostic link driver for ANT network processors
//!
//! This crate contains everything between the serial port and the
//! application that does not depend on a specific board:
//!
//! - Packet reader with sync, checksum and timeout handling
//! - Flow-control gate (RTS grant plus single outstanding response)
//! - Transmitter and hardware reset
//! - Channel establishment state machine with stall recovery
//! - Link and channel configuration
//!
//! Everything is polled from one control loop. The only input that may
//! arrive from another context is the RTS edge, which lands in a
//! [`flow::ReadySignal`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod control;
pub mod driver;
pub mod error;
pub mod establish;
pub mod flow;
pub mod reader;

#[cfg(test)]
mod mock;

pub use config::{ChannelConfig, LinkConfig};
pub use control::{PinControl, RadioControl};
pub use driver::AntDriver;
pub use error::LinkError;
pub use establish::{ChannelSetup, EstablishStatus, SetupStep, StepAction};
pub use flow::{FlowGate, ReadySignal, ResponseWait};
pub use reader::{PacketReader, Received};
