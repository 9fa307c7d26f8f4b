//! RP2040 implementations of the antlink-hal traits
//!
//! Thin newtypes over embassy-rp and embassy-time so the link driver can
//! run on an RP2040 without knowing about embassy.
//!
//! - GPIO control lines and the RTS input
//! - Buffered UART as a polled byte transport
//! - Monotonic clock from the embassy time driver

#![no_std]

pub mod gpio;
pub mod serial;
pub mod time;

pub use gpio::{MirroredLevel, RpOutput};
pub use serial::{uart_config, RpSerial};
pub use time::EmbassyClock;
