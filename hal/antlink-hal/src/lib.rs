//! antlink Hardware Abstraction Layer
//!
//! The radio driver talks to the outside world through a handful of small
//! traits. Board support crates implement them for a concrete chip; tests
//! implement them with in-memory mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  antlink-core (driver, state machine)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  antlink-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ antlink-hal-  │       │  host mocks   │
//! │    rp2040     │       │   (tests)     │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Radio control lines
//! - [`serial::ByteTransport`] - Polled duplex byte stream
//! - [`time::Clock`] - Monotonic millisecond time source

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod serial;
pub mod time;

pub use gpio::{InputPin, OutputPin};
pub use serial::{ByteTransport, SerialConfig};
pub use time::Clock;
