//! Radio configuration compiled in from radio.toml
//!
//! `build.rs` validates the file and emits `SERIAL`, `LINK` and `CHANNEL`.

use antlink_core::{ChannelConfig, LinkConfig};
use antlink_hal::SerialConfig;
use antlink_protocol::SYNC_TX;

include!(concat!(env!("OUT_DIR"), "/radio_config.rs"));
